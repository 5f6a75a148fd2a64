//! Edge synthesis: connect each station to a random-sized prefix of its
//! nearest neighbors.
//!
//! Every station runs its own selection, so a station's final degree is the
//! union of "I chose you" and "you chose me" — it is not bounded by the
//! density parameter alone.

use bevy::math::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::{SimulationConfig, EDGE_WEIGHT_DIVISOR};
use crate::placement::StationLayout;
use crate::rail_graph::{GraphError, RailGraph};

/// A neighboring station and its Euclidean distance, pre-edge-selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceCandidate {
    pub name: String,
    pub distance: f32,
}

/// Every other placed station, sorted ascending by distance. Ties break on
/// name so candidate order is deterministic.
pub fn nearest_candidates(name: &str, origin: Vec2, layout: &StationLayout) -> Vec<DistanceCandidate> {
    let mut candidates: Vec<DistanceCandidate> = layout
        .iter()
        .filter(|(other, _)| *other != name)
        .map(|(other, pos)| DistanceCandidate {
            name: other.to_string(),
            distance: origin.distance(pos),
        })
        .collect();
    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.name.cmp(&b.name))
    });
    candidates
}

/// Derive an edge weight from a pixel distance: scaled, rounded, never zero.
pub fn edge_weight(distance: f32) -> u32 {
    ((distance / EDGE_WEIGHT_DIVISOR).round() as u32).max(1)
}

/// Add edges for every vertex of `graph` from its nearest-candidate prefix.
///
/// The prefix length is drawn uniformly from `[2, connection_density]` per
/// station (clamped to the candidates available).
pub fn synthesize_edges(
    graph: &mut RailGraph,
    layout: &StationLayout,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(), GraphError> {
    let names: Vec<String> = graph.vertex_names().to_vec();
    let density = config.connection_density.max(2);
    for name in &names {
        let Some(origin) = layout.get(name) else {
            return Err(GraphError::UnknownVertex(name.clone()));
        };
        let candidates = nearest_candidates(name, origin, layout);
        if candidates.is_empty() {
            continue;
        }
        let picked = (rng.gen_range(2..=density) as usize).min(candidates.len());
        for candidate in &candidates[..picked] {
            graph.add_edge(name, &candidate.name, edge_weight(candidate.distance))?;
        }
    }
    Ok(())
}
