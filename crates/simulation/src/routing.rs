//! Shortest-path routing over the rail graph, with a per-session cache.
//!
//! Dijkstra itself comes from the `pathfinding` crate; this module adapts
//! the adjacency lists to its successor-closure interface and owns the
//! route cache. The build orchestrator guarantees connectivity, so an
//! unreachable pair means the router was exercised against a partial graph
//! (tests do this deliberately) — it yields `None`, never a hang.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::rail_graph::RailGraph;
use crate::track_segments::SegmentId;

/// Minimum-weight path from `start` to `end`, inclusive of both, reading
/// start→end. `None` when either endpoint is unknown or no path exists.
pub fn find_route(graph: &RailGraph, start: &str, end: &str) -> Option<Vec<String>> {
    if !graph.contains(start) || !graph.contains(end) {
        return None;
    }
    let (path, _cost) = pathfinding::prelude::dijkstra(
        &start,
        |&name| {
            graph
                .neighbors(name)
                .iter()
                .map(|n| (n.name.as_str(), n.weight))
                .collect::<Vec<_>>()
        },
        |&name| name == end,
    )?;
    Some(path.into_iter().map(str::to_string).collect())
}

/// Session-lifetime cache of materialized routes keyed by endpoint pair.
///
/// No eviction: the name universe is bounded, so the cache tops out at N²
/// entries.
#[derive(Resource, Debug, Default)]
pub struct RouteCache {
    routes: BTreeMap<(String, String), Vec<SegmentId>>,
    pub hits: u64,
    pub misses: u64,
}

impl RouteCache {
    pub fn get(&mut self, start: &str, end: &str) -> Option<&Vec<SegmentId>> {
        let route = self.routes.get(&(start.to_string(), end.to_string()));
        if route.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        route
    }

    pub fn insert(&mut self, start: &str, end: &str, segments: Vec<SegmentId>) {
        self.routes
            .insert((start.to_string(), end.to_string()), segments);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
