//! Rail network simulation core.
//!
//! Procedurally generates a weighted undirected station graph, lays it out
//! on a bounded canvas without overlap, prunes geometrically redundant
//! edges, and moves trains along cached shortest-path routes, optionally
//! propagating an infection between trains and stations.
//!
//! All randomness flows through the seeded [`sim_rng::SimRng`] resource, so
//! a run is fully reproducible from its `SimulationConfig`.

use bevy::prelude::*;

pub mod collision_pruning;
pub mod config;
pub mod edge_synthesis;
pub mod geometry;
pub mod network_builder;
pub mod pandemic;
pub mod placement;
pub mod rail_graph;
pub mod routing;
pub mod sim_rng;
pub mod track_segments;
pub mod trains;

#[cfg(test)]
mod integration_tests;

use config::SimulationConfig;
use pandemic::PandemicStats;
use routing::RouteCache;
use sim_rng::SimRng;
use trains::TrainArrival;

/// Fixed ticks elapsed since startup.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

fn count_ticks(mut counter: ResMut<TickCounter>) {
    counter.0 += 1;
}

/// Seed the simulation RNG from the configured seed before anything that
/// draws from it.
fn seed_rng(mut commands: Commands, config: Res<SimulationConfig>) {
    commands.insert_resource(SimRng::from_seed_u64(config.seed));
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>()
            .init_resource::<RouteCache>()
            .init_resource::<PandemicStats>()
            .init_resource::<TickCounter>()
            .add_event::<TrainArrival>()
            .add_systems(
                Startup,
                (
                    seed_rng,
                    network_builder::init_network,
                    trains::spawn_trains,
                    pandemic::seed_infection,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    count_ticks,
                    trains::advance_trains,
                    trains::assign_new_routes,
                    pandemic::process_arrivals,
                )
                    .chain(),
            );
    }
}
