//! Canvas geometry constants, attempt budgets, and the run configuration.
//!
//! All widths, heights, and radii are in canvas pixels. The constants were
//! tuned together: the placement bounds, exclusion radius, and attempt
//! budgets assume each other, so change them as a set.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const CANVAS_WIDTH: f32 = 1400.0;
pub const CANVAS_HEIGHT: f32 = 800.0;

/// Visual radius of a station circle.
pub const STATION_RADIUS: f32 = 25.0;

/// Closest allowed axis-wise placement of one station next to another.
pub const EXCLUSION_RADIUS: f32 = STATION_RADIUS * 3.0;

/// Placement area: canvas padded by the station radius on each side.
pub const X_PLACEMENT_BOUND: f32 = CANVAS_WIDTH - STATION_RADIUS;
pub const Y_PLACEMENT_BOUND: f32 = CANVAS_HEIGHT - STATION_RADIUS;

/// Coordinate draws allowed per station before placement aborts.
pub const ABORT_PLACEMENT_ATTEMPTS: u32 = 200;

/// Full place→synthesize→prune→check cycles allowed before the build aborts.
pub const ABORT_GRAPH_BUILD_ATTEMPTS: u32 = 200;

/// An edge is pruned when a third station sits within this distance of it.
pub const COLLISION_TOLERANCE: f32 = STATION_RADIUS * 2.0;

/// Edge weights are the pixel distance divided by this, rounded, min 1.
pub const EDGE_WEIGHT_DIVISOR: f32 = 10.0;

/// Distance a train covers per fixed tick at speed factor 1.0 and
/// `global_speed_modifier` 1.0.
pub const TRAIN_BASE_SPEED: f32 = 2.0;

/// Ticks a train waits at a station before departing.
pub const STATION_DWELL_TICKS: u32 = 30;

/// Station name pool; a run uses the first `stations_count` entries.
pub const STATION_NAMES: [&str; 25] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Hotel", "India", "Juliett", "Kilo",
    "Lima", "Mike", "November", "Oscar", "Papa", "Quebec", "Romeo", "Sierra", "Tango", "Uniform",
    "Victor", "Whiskey", "XRay", "Yankee", "Zulu",
];

/// Train name pool, cycled when `trains_count` exceeds it.
pub const TRAIN_NAMES: [&str; 12] = [
    "Aurora", "Borealis", "Cannonball", "Dixie", "Empire", "Flyer", "Galaxy", "Hiawatha",
    "Meteor", "Pioneer", "Rocket", "Zephyr",
];

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Parameters read once per run. No dynamic reconfiguration mid-build.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Stations to generate, capped at the name pool size.
    pub stations_count: usize,
    pub trains_count: usize,
    /// Upper bound of the nearest-neighbor prefix each station connects to.
    pub connection_density: u32,
    /// Snap placements to a grid of `EXCLUSION_RADIUS`-sized cells.
    pub snap_to_grid: bool,
    pub global_speed_modifier: f32,
    /// Seed one infected train and propagate infection through arrivals.
    pub pandemic: bool,
    /// Seed for all simulation randomness; identical seeds reproduce the
    /// network and every itinerary exactly.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stations_count: 12,
            trains_count: 4,
            connection_density: 5,
            snap_to_grid: true,
            global_speed_modifier: 1.0,
            pandemic: false,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Station names selected for this run, in definition order.
    pub fn station_names(&self) -> Vec<String> {
        STATION_NAMES
            .iter()
            .take(self.stations_count.min(STATION_NAMES.len()))
            .map(|s| s.to_string())
            .collect()
    }
}
