//! Build orchestration: place → synthesize → prune → connectivity check.
//!
//! Random placement plus random edge density sometimes yields isolated
//! clusters. Rather than repairing a disconnected graph incrementally, the
//! builder throws the whole attempt away and regenerates from scratch
//! inside one bounded loop. Placement exhaustion is fatal immediately and
//! is not retried here.

use std::fmt;

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::collision_pruning::prune_collisions;
use crate::config::{SimulationConfig, ABORT_GRAPH_BUILD_ATTEMPTS};
use crate::edge_synthesis::synthesize_edges;
use crate::placement::{place_stations, PlacementExhausted, StationLayout};
use crate::rail_graph::RailGraph;
use crate::sim_rng::SimRng;
use crate::track_segments::TrackSegmentStore;

#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A station could not be placed within the draw budget.
    Placement(PlacementExhausted),
    /// No attempt produced a fully connected graph.
    GraphBuildExhausted { attempts: u32 },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Placement(inner) => inner.fmt(f),
            BuildError::GraphBuildExhausted { attempts } => {
                write!(f, "couldn't build a connected graph in {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for BuildError {}

impl From<PlacementExhausted> for BuildError {
    fn from(inner: PlacementExhausted) -> Self {
        BuildError::Placement(inner)
    }
}

/// The finished product of a successful build: the connected graph plus the
/// coordinates it was generated against.
#[derive(Resource, Debug, Clone)]
pub struct RailNetwork {
    pub graph: RailGraph,
    pub layout: StationLayout,
}

/// Run bounded build attempts until the pruned graph is connected.
pub fn build_network(
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> Result<RailNetwork, BuildError> {
    build_network_with_budget(config, rng, ABORT_GRAPH_BUILD_ATTEMPTS)
}

/// `build_network` with an explicit attempt budget. Exhausting the budget
/// yields `GraphBuildExhausted`; a zero budget fails without attempting.
pub fn build_network_with_budget(
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
    max_attempts: u32,
) -> Result<RailNetwork, BuildError> {
    let names = config.station_names();
    for attempt in 0..max_attempts {
        let mut graph = RailGraph::with_vertices(&names);
        let layout = place_stations(&names, config, rng)?;
        synthesize_edges(&mut graph, &layout, config, rng)
            .expect("every synthesized vertex is registered and placed");
        let pruned = prune_collisions(&mut graph, &layout);

        if graph.is_connected() {
            info!(
                "attempts needed to build graph: {} ({} stations, {} edges, {} pruned)",
                attempt + 1,
                graph.vertex_count(),
                graph.edge_count(),
                pruned
            );
            return Ok(RailNetwork { graph, layout });
        }
        debug!("build attempt {} produced a disconnected graph", attempt + 1);
    }
    Err(BuildError::GraphBuildExhausted {
        attempts: max_attempts,
    })
}

/// Startup system: build the network from the seeded RNG and insert the
/// `RailNetwork` and `TrackSegmentStore` resources. Build failure is
/// unrecoverable and exits the app.
pub fn init_network(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut rng: ResMut<SimRng>,
    mut exit: EventWriter<AppExit>,
) {
    match build_network(&config, &mut rng.0) {
        Ok(network) => {
            let segments = TrackSegmentStore::from_network(&network);
            commands.insert_resource(segments);
            commands.insert_resource(network);
        }
        Err(err) => {
            error!("network build failed: {err}");
            exit.send(AppExit::error());
        }
    }
}
