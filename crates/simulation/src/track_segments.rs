//! Drawable track segments and route materialization.
//!
//! The renderer's contract with the core is a per-station mapping from
//! `from → to` to a traversable segment exposing its length and
//! point-at-length. With rendering out of process, the store owns that
//! mapping as plain line segments built from the final network; trains
//! advance along these.

use std::collections::BTreeMap;
use std::fmt;

use bevy::math::Vec2;
use bevy::prelude::Resource;

use crate::network_builder::RailNetwork;

/// Identifies one directed traversal of an edge, `from` station to `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SegmentId {
    pub from: String,
    pub to: String,
}

impl SegmentId {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// A straight traversable segment between two station coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSegment {
    pub from: Vec2,
    pub to: Vec2,
}

impl TrackSegment {
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Point at `distance` along the segment from its start, clamped to the
    /// endpoints.
    pub fn point_at_length(&self, distance: f32) -> Vec2 {
        let length = self.length();
        if length <= f32::EPSILON {
            return self.from;
        }
        self.from.lerp(self.to, (distance / length).clamp(0.0, 1.0))
    }
}

/// A consecutive route pair had no registered segment: the graph and the
/// segment store disagree, which means they were built from different edge
/// sets. Defensive, not user-recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLookupMiss {
    pub from: String,
    pub to: String,
}

impl fmt::Display for SegmentLookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no track segment registered for {}-{}", self.from, self.to)
    }
}

impl std::error::Error for SegmentLookupMiss {}

/// All track segments for a built network, one per adjacency direction.
#[derive(Resource, Debug, Default)]
pub struct TrackSegmentStore {
    segments: BTreeMap<(String, String), TrackSegment>,
}

impl TrackSegmentStore {
    /// Build the store from a finished network. Every directed adjacency
    /// entry gets a segment, so materialization can never miss unless the
    /// graph is mutated afterwards.
    pub fn from_network(network: &RailNetwork) -> Self {
        let mut segments = BTreeMap::new();
        for name in network.graph.vertex_names() {
            let Some(from) = network.layout.get(name) else {
                continue;
            };
            for neighbor in network.graph.neighbors(name) {
                let Some(to) = network.layout.get(&neighbor.name) else {
                    continue;
                };
                segments.insert(
                    (name.clone(), neighbor.name.clone()),
                    TrackSegment { from, to },
                );
            }
        }
        Self { segments }
    }

    pub fn get(&self, id: &SegmentId) -> Option<&TrackSegment> {
        self.segments.get(&(id.from.clone(), id.to.clone()))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Convert a vertex path into traversable segments, one per consecutive
    /// pair.
    pub fn materialize_route(&self, path: &[String]) -> Result<Vec<SegmentId>, SegmentLookupMiss> {
        let mut route = Vec::with_capacity(path.len().saturating_sub(1));
        for pair in path.windows(2) {
            let id = SegmentId::new(&pair[0], &pair[1]);
            if self.get(&id).is_none() {
                return Err(SegmentLookupMiss {
                    from: id.from,
                    to: id.to,
                });
            }
            route.push(id);
        }
        Ok(route)
    }
}
