//! Random station placement with collision avoidance.
//!
//! Each station gets a uniform random coordinate inside the padded canvas,
//! optionally snapped to an `EXCLUSION_RADIUS` grid, and is rejected while
//! it falls inside any already-placed station's exclusion window. The draw
//! budget is a hard loop bound: exhausting it aborts the whole build
//! attempt.

use std::collections::BTreeMap;
use std::fmt;

use bevy::math::Vec2;
use rand::Rng;

use crate::config::{
    SimulationConfig, ABORT_PLACEMENT_ATTEMPTS, EXCLUSION_RADIUS, STATION_RADIUS,
    X_PLACEMENT_BOUND, Y_PLACEMENT_BOUND,
};
use crate::geometry::within_exclusion_zone;

/// The placer could not fit a station within its draw budget.
///
/// Fatal to the current build attempt; carries the configured radii so the
/// failure is diagnosable from the log alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementExhausted {
    pub name: String,
    pub attempts: u32,
    pub exclusion_radius: f32,
    pub width: f32,
    pub height: f32,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "couldn't fit station '{}' after {} attempts \
             (exclusion radius {}px, placement area {}x{}px)",
            self.name, self.attempts, self.exclusion_radius, self.width, self.height
        )
    }
}

impl std::error::Error for PlacementExhausted {}

/// Final station coordinates for one build, keyed by station name.
#[derive(Debug, Clone, Default)]
pub struct StationLayout {
    positions: BTreeMap<String, Vec2>,
}

impl StationLayout {
    /// Build a layout from explicit coordinates. The placer is the normal
    /// producer; this exists for tests and hand-authored maps.
    pub fn from_positions(positions: BTreeMap<String, Vec2>) -> Self {
        Self { positions }
    }

    pub fn get(&self, name: &str) -> Option<Vec2> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec2)> {
        self.positions.iter().map(|(name, pos)| (name.as_str(), *pos))
    }
}

/// Assign a coordinate to every station name, in order.
pub fn place_stations(
    names: &[String],
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Result<StationLayout, PlacementExhausted> {
    let mut layout = StationLayout::default();
    for name in names {
        let position = place_station(name, &layout, config, rng)?;
        layout.positions.insert(name.clone(), position);
    }
    Ok(layout)
}

fn place_station(
    name: &str,
    layout: &StationLayout,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Result<Vec2, PlacementExhausted> {
    for _ in 0..ABORT_PLACEMENT_ATTEMPTS {
        let mut x = rng.gen_range(STATION_RADIUS..=X_PLACEMENT_BOUND);
        let mut y = rng.gen_range(STATION_RADIUS..=Y_PLACEMENT_BOUND);
        if config.snap_to_grid {
            x -= x % EXCLUSION_RADIUS;
            y -= y % EXCLUSION_RADIUS;
        }

        // Snapping can push a coordinate out of the padded area; that draw
        // still counts against the budget.
        if x < STATION_RADIUS || y < STATION_RADIUS || x > X_PLACEMENT_BOUND || y > Y_PLACEMENT_BOUND
        {
            continue;
        }

        let candidate = Vec2::new(x, y);
        let blocked = layout
            .iter()
            .any(|(_, placed)| within_exclusion_zone(candidate, placed, EXCLUSION_RADIUS));
        if !blocked {
            return Ok(candidate);
        }
    }

    Err(PlacementExhausted {
        name: name.to_string(),
        attempts: ABORT_PLACEMENT_ATTEMPTS,
        exclusion_radius: EXCLUSION_RADIUS,
        width: X_PLACEMENT_BOUND,
        height: Y_PLACEMENT_BOUND,
    })
}
