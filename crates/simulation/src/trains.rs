//! Trains: spawning, per-tick movement along track segments, and re-routing.
//!
//! A train is a single component parameterized by a `TrainKind` data table —
//! kinds differ only in speed factor, not behavior. Movement is a small
//! state machine per fixed tick: dwell at a station, advance along the
//! current segment, or (once the route is exhausted) pick a new random
//! destination, consulting the route cache before recomputing.

use bevy::prelude::*;
use rand::seq::SliceRandom;

use crate::config::{SimulationConfig, STATION_DWELL_TICKS, TRAIN_BASE_SPEED, TRAIN_NAMES};
use crate::network_builder::RailNetwork;
use crate::routing::{find_route, RouteCache};
use crate::sim_rng::SimRng;
use crate::track_segments::{SegmentId, TrackSegmentStore};

/// Train variants as a data table: behavior is uniform, only the speed
/// factor (and the renderer's visual, which lives out of process) differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainKind {
    Freight,
    Passenger,
    Bullet,
}

impl TrainKind {
    pub const ALL: [TrainKind; 3] = [TrainKind::Freight, TrainKind::Passenger, TrainKind::Bullet];

    pub fn speed_factor(self) -> f32 {
        match self {
            TrainKind::Freight => 0.6,
            TrainKind::Passenger => 1.0,
            TrainKind::Bullet => 1.6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrainKind::Freight => "freight",
            TrainKind::Passenger => "passenger",
            TrainKind::Bullet => "bullet",
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Train {
    pub name: String,
    pub kind: TrainKind,
}

/// The itinerary a train is currently traversing.
#[derive(Component, Debug, Clone)]
pub struct TrainRoute {
    pub segments: Vec<SegmentId>,
    /// Index into `segments` of the segment being traversed.
    pub current: usize,
    /// Distance covered along the current segment, in pixels.
    pub traveled: f32,
    pub destination: String,
    /// Ticks left to wait at a station before departing.
    pub dwell_remaining: u32,
}

impl TrainRoute {
    pub fn new(segments: Vec<SegmentId>, destination: String) -> Self {
        Self {
            segments,
            current: 0,
            traveled: 0.0,
            destination,
            dwell_remaining: 0,
        }
    }

    /// Has every segment of the itinerary been traversed?
    pub fn finished(&self) -> bool {
        self.current >= self.segments.len()
    }
}

/// Current canvas coordinates of a train.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TrainPosition(pub Vec2);

/// Emitted when a train reaches the end of a segment (a station).
#[derive(Event, Debug, Clone)]
pub struct TrainArrival {
    pub train: Entity,
    pub station: String,
    pub end_of_route: bool,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Startup: spawn `trains_count` trains on random routes across the built
/// network. Skipped entirely when the network build failed.
pub fn spawn_trains(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    network: Option<Res<RailNetwork>>,
    store: Option<Res<TrackSegmentStore>>,
    mut cache: ResMut<RouteCache>,
    mut rng: ResMut<SimRng>,
) {
    let (Some(network), Some(store)) = (network, store) else {
        return;
    };
    let names = network.graph.vertex_names();
    if names.len() < 2 {
        warn!("not enough stations to schedule trains");
        return;
    }

    for i in 0..config.trains_count {
        let Some(start) = names.choose(&mut rng.0) else {
            return;
        };
        let others: Vec<&String> = names.iter().filter(|n| *n != start).collect();
        let Some(&end) = others.choose(&mut rng.0) else {
            return;
        };

        let Some(path) = find_route(&network.graph, start, end) else {
            // The builder guarantees connectivity; reaching this is a bug.
            error!("no route from {start} to {end} on a connected graph");
            continue;
        };
        let segments = match store.materialize_route(&path) {
            Ok(segments) => segments,
            Err(miss) => {
                error!("graph/segment desync while scheduling: {miss}");
                continue;
            }
        };
        cache.insert(start, end, segments.clone());

        let Some(position) = network.layout.get(start) else {
            continue;
        };
        let train = Train {
            name: TRAIN_NAMES[i % TRAIN_NAMES.len()].to_string(),
            kind: TrainKind::ALL[i % TrainKind::ALL.len()],
        };
        info!(
            "{} train {} scheduled: {}",
            train.kind.label(),
            train.name,
            path.join(" - ")
        );
        commands.spawn((
            train,
            TrainRoute::new(segments, end.clone()),
            TrainPosition(position),
        ));
    }
}

/// FixedUpdate: advance every train along its current segment.
///
/// Per train and tick exactly one of: sit out a dwell tick, move along the
/// segment, or arrive at the segment's destination station (emitting a
/// `TrainArrival` and starting the dwell).
pub fn advance_trains(
    config: Res<SimulationConfig>,
    store: Option<Res<TrackSegmentStore>>,
    mut arrivals: EventWriter<TrainArrival>,
    mut trains: Query<(Entity, &Train, &mut TrainRoute, &mut TrainPosition)>,
) {
    let Some(store) = store else {
        return;
    };
    for (entity, train, mut route, mut position) in &mut trains {
        if route.dwell_remaining > 0 {
            route.dwell_remaining -= 1;
            continue;
        }
        if route.finished() {
            // Waiting for a new itinerary.
            continue;
        }

        let segment_id = route.segments[route.current].clone();
        let Some(segment) = store.get(&segment_id) else {
            error!("no track segment registered for {segment_id}");
            continue;
        };

        let speed = TRAIN_BASE_SPEED * train.kind.speed_factor() * config.global_speed_modifier;
        route.traveled += speed;

        if route.traveled >= segment.length() {
            position.0 = segment.to;
            route.current += 1;
            route.traveled = 0.0;
            route.dwell_remaining = STATION_DWELL_TICKS;
            arrivals.send(TrainArrival {
                train: entity,
                station: segment_id.to.clone(),
                end_of_route: route.finished(),
            });
        } else {
            position.0 = segment.point_at_length(route.traveled);
        }
    }
}

/// FixedUpdate: give every train that finished its route (and its dwell) a
/// new random destination, reusing cached routes for previously traveled
/// endpoint pairs.
pub fn assign_new_routes(
    network: Option<Res<RailNetwork>>,
    store: Option<Res<TrackSegmentStore>>,
    mut cache: ResMut<RouteCache>,
    mut rng: ResMut<SimRng>,
    mut trains: Query<(&Train, &mut TrainRoute)>,
) {
    let (Some(network), Some(store)) = (network, store) else {
        return;
    };
    for (train, mut route) in &mut trains {
        if !route.finished() || route.dwell_remaining > 0 {
            continue;
        }

        let start = route.destination.clone();
        let names = network.graph.vertex_names();
        let others: Vec<&String> = names.iter().filter(|n| **n != start).collect();
        let Some(&end) = others.choose(&mut rng.0) else {
            continue;
        };

        let segments = if let Some(cached) = cache.get(&start, end) {
            cached.clone()
        } else {
            let Some(path) = find_route(&network.graph, &start, end) else {
                error!("no route from {start} to {end} on a connected graph");
                continue;
            };
            match store.materialize_route(&path) {
                Ok(segments) => {
                    cache.insert(&start, end, segments.clone());
                    segments
                }
                Err(miss) => {
                    error!("graph/segment desync while re-routing: {miss}");
                    continue;
                }
            }
        };

        debug!("new route for {}: {} to {}", train.name, start, end);
        *route = TrainRoute::new(segments, end.clone());
    }
}
