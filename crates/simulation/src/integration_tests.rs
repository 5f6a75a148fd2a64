//! End-to-end tests over a headless `App`.
//!
//! The harness runs the `FixedUpdate` schedule directly rather than going
//! through Bevy's time accumulation, so tick counts in tests are exact.

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::network_builder::{build_network, RailNetwork};
use crate::pandemic::PandemicStats;
use crate::routing::{find_route, RouteCache};
use crate::track_segments::TrackSegmentStore;
use crate::trains::{Train, TrainPosition, TrainRoute};
use crate::{SimulationPlugin, TickCounter};

struct TestSim {
    app: App,
}

impl TestSim {
    fn new(config: SimulationConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.add_plugins(SimulationPlugin);
        // One update so Startup systems run (build, spawn, seed).
        app.update();
        Self { app }
    }

    fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Train positions keyed by train name, sorted for comparison.
    fn train_positions(&mut self) -> Vec<(String, Vec2)> {
        let mut query = self.world_mut().query::<(&Train, &TrainPosition)>();
        let mut positions: Vec<(String, Vec2)> = query
            .iter(self.app.world())
            .map(|(train, pos)| (train.name.clone(), pos.0))
            .collect();
        positions.sort_by(|a, b| a.0.cmp(&b.0));
        positions
    }
}

// ---------------------------------------------------------------------------
// Startup and build
// ---------------------------------------------------------------------------

#[test]
fn test_startup_builds_network_and_spawns_trains() {
    let mut sim = TestSim::new(SimulationConfig::default());
    let network = sim.world_mut().resource::<RailNetwork>();
    assert!(network.graph.is_connected());
    assert_eq!(network.graph.vertex_count(), 12);

    let store = sim.world_mut().resource::<TrackSegmentStore>();
    assert!(!store.is_empty());

    let mut query = sim.world_mut().query::<&Train>();
    assert_eq!(query.iter(sim.app.world()).count(), 4);
}

#[test]
fn test_trains_move_and_eventually_reroute() {
    let mut sim = TestSim::new(SimulationConfig::default());
    let before = sim.train_positions();
    sim.tick(50);
    let after = sim.train_positions();
    assert!(
        before.iter().zip(&after).any(|(a, b)| a.1 != b.1),
        "some train should have moved within 50 ticks"
    );

    sim.tick(12000);
    let cache = sim.world_mut().resource::<RouteCache>();
    assert!(
        cache.hits + cache.misses > 0,
        "at least one train should have finished a route and asked for a new one"
    );
}

#[test]
fn test_tick_counter_tracks_fixed_updates() {
    let mut sim = TestSim::new(SimulationConfig::default());
    assert_eq!(sim.world_mut().resource::<TickCounter>().0, 0);
    sim.tick(25);
    assert_eq!(sim.world_mut().resource::<TickCounter>().0, 25);
}

#[test]
fn test_finished_routes_are_replaced() {
    let mut sim = TestSim::new(SimulationConfig::default());
    sim.tick(12000);
    // After the re-route system has run, no train sits on a finished route
    // with its dwell elapsed.
    let mut query = sim.world_mut().query::<&TrainRoute>();
    for route in query.iter(sim.app.world()) {
        assert!(
            !route.finished() || route.dwell_remaining > 0 || route.segments.is_empty(),
            "finished route with elapsed dwell should have been replaced"
        );
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn test_identical_seeds_reproduce_the_run() {
    let config = SimulationConfig {
        seed: 1234,
        pandemic: true,
        trains_count: 6,
        ..Default::default()
    };
    let mut a = TestSim::new(config.clone());
    let mut b = TestSim::new(config);
    a.tick(500);
    b.tick(500);

    assert_eq!(a.train_positions(), b.train_positions());

    let net_a = a.world_mut().resource::<RailNetwork>();
    let net_b = b.world_mut().resource::<RailNetwork>();
    assert_eq!(
        net_a.layout.iter().collect::<Vec<_>>(),
        net_b.layout.iter().collect::<Vec<_>>()
    );
    for name in net_a.graph.vertex_names() {
        assert_eq!(net_a.graph.neighbors(name), net_b.graph.neighbors(name));
    }
}

#[test]
fn test_different_seeds_differ() {
    let mut a = TestSim::new(SimulationConfig {
        seed: 1,
        ..Default::default()
    });
    let mut b = TestSim::new(SimulationConfig {
        seed: 2,
        ..Default::default()
    });
    let net_a = a.world_mut().resource::<RailNetwork>().layout.iter().collect::<Vec<_>>();
    let net_b = b.world_mut().resource::<RailNetwork>().layout.iter().collect::<Vec<_>>();
    assert_ne!(net_a, net_b);
}

// ---------------------------------------------------------------------------
// Pandemic propagation
// ---------------------------------------------------------------------------

#[test]
fn test_pandemic_seeds_patient_zero() {
    let mut sim = TestSim::new(SimulationConfig {
        pandemic: true,
        trains_count: 6,
        ..Default::default()
    });
    let stats = sim.world_mut().resource::<PandemicStats>();
    assert_eq!(stats.infected_trains, 1);
    assert_eq!(stats.infected_stations.len(), 1);
}

#[test]
fn test_pandemic_spreads_through_arrivals() {
    let mut sim = TestSim::new(SimulationConfig {
        pandemic: true,
        trains_count: 6,
        seed: 7,
        ..Default::default()
    });
    sim.tick(6000);
    let stats = sim.world_mut().resource::<PandemicStats>();
    assert!(
        stats.infected_stations.len() >= 2,
        "patient zero's first arrival should infect a second station, got {:?}",
        stats.infected_stations
    );
}

#[test]
fn test_pandemic_disabled_stays_clean() {
    let mut sim = TestSim::new(SimulationConfig::default());
    sim.tick(3000);
    let stats = sim.world_mut().resource::<PandemicStats>();
    assert_eq!(stats.infected_trains, 0);
    assert!(stats.infected_stations.is_empty());
}

// ---------------------------------------------------------------------------
// Route materialization round trip (all pairs)
// ---------------------------------------------------------------------------

#[test]
fn test_every_pair_routes_and_materializes() {
    use rand::SeedableRng;
    let config = SimulationConfig::default();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(17);
    let network = build_network(&config, &mut rng).expect("builds");
    let store = TrackSegmentStore::from_network(&network);

    let names = network.graph.vertex_names();
    for start in names {
        for end in names {
            if start == end {
                continue;
            }
            let path = find_route(&network.graph, start, end)
                .unwrap_or_else(|| panic!("no route {start} -> {end} on a connected graph"));
            assert_eq!(path.first(), Some(start));
            assert_eq!(path.last(), Some(end));
            let segments = store.materialize_route(&path).expect("segments registered");
            assert_eq!(segments.len(), path.len() - 1);
        }
    }
}
