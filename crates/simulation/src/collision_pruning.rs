//! Geometric pruning of redundant edges.
//!
//! Random nearest-neighbor selection sometimes produces an edge A-B whose
//! straight segment runs through a third connected station C. The A-B edge
//! duplicates the more natural A-C-B path, so it is removed. The pass
//! mutates adjacency lists while walking them, so each vertex iterates over
//! a snapshot of its list taken before any removal.

use bevy::log::debug;

use crate::config::COLLISION_TOLERANCE;
use crate::geometry::segment_intersects_circle;
use crate::placement::StationLayout;
use crate::rail_graph::RailGraph;

/// Remove every edge that passes within the collision tolerance of a third
/// neighboring station. Returns the number of edges removed.
pub fn prune_collisions(graph: &mut RailGraph, layout: &StationLayout) -> u32 {
    let mut removed = 0;
    let names: Vec<String> = graph.vertex_names().to_vec();
    for name in &names {
        let Some(origin) = layout.get(name) else {
            continue;
        };
        let neighbor_names: Vec<String> = graph
            .neighbors(name)
            .iter()
            .map(|n| n.name.clone())
            .collect();
        for target in &neighbor_names {
            // Earlier removals in this pass may already have dropped it.
            if !graph.has_edge(name, target) {
                continue;
            }
            let Some(target_pos) = layout.get(target) else {
                continue;
            };
            for third in neighbor_names.iter().filter(|t| *t != target) {
                let Some(third_pos) = layout.get(third) else {
                    continue;
                };
                if segment_intersects_circle(origin, target_pos, third_pos, COLLISION_TOLERANCE) {
                    debug!("[{name}] intersects with [{third}] on the way to [{target}]");
                    graph.remove_edge(name, target);
                    removed += 1;
                    break;
                }
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;
    use std::collections::BTreeMap;

    fn world(points: &[(&str, f32, f32)], edges: &[(&str, &str)]) -> (RailGraph, StationLayout) {
        let mut graph = RailGraph::new();
        let mut positions = BTreeMap::new();
        for (name, x, y) in points {
            graph.add_vertex(name);
            positions.insert(name.to_string(), Vec2::new(*x, *y));
        }
        for (a, b) in edges {
            graph.add_edge(a, b, 1).unwrap();
        }
        (graph, StationLayout::from_positions(positions))
    }

    #[test]
    fn test_colinear_station_prunes_long_edge() {
        // C sits exactly on the A-B segment: A-B is redundant, A-C stays.
        let (mut graph, layout) = world(
            &[("A", 0.0, 0.0), ("B", 1000.0, 0.0), ("C", 500.0, 0.0)],
            &[("A", "B"), ("A", "C")],
        );
        let removed = prune_collisions(&mut graph, &layout);
        assert_eq!(removed, 1);
        assert!(!graph.has_edge("A", "B"));
        assert!(graph.has_edge("A", "C"));
    }

    #[test]
    fn test_offset_station_within_tolerance_prunes() {
        // C is off the segment but within the tolerance radius of it.
        let (mut graph, layout) = world(
            &[
                ("A", 0.0, 0.0),
                ("B", 1000.0, 0.0),
                ("C", 500.0, COLLISION_TOLERANCE - 1.0),
            ],
            &[("A", "B"), ("A", "C")],
        );
        prune_collisions(&mut graph, &layout);
        assert!(!graph.has_edge("A", "B"));
    }

    #[test]
    fn test_station_beyond_tolerance_keeps_edge() {
        let (mut graph, layout) = world(
            &[
                ("A", 0.0, 0.0),
                ("B", 1000.0, 0.0),
                ("C", 500.0, COLLISION_TOLERANCE + 1.0),
            ],
            &[("A", "B"), ("A", "C")],
        );
        let removed = prune_collisions(&mut graph, &layout);
        assert_eq!(removed, 0);
        assert!(graph.has_edge("A", "B"));
    }

    #[test]
    fn test_unconnected_third_station_is_ignored() {
        // C lies on the A-B segment but is not a neighbor of A, so the
        // pass has no grounds to call A-B redundant.
        let (mut graph, layout) = world(
            &[("A", 0.0, 0.0), ("B", 1000.0, 0.0), ("C", 500.0, 0.0)],
            &[("A", "B")],
        );
        let removed = prune_collisions(&mut graph, &layout);
        assert_eq!(removed, 0);
        assert!(graph.has_edge("A", "B"));
    }

    #[test]
    fn test_mid_pass_removal_does_not_panic_or_double_count() {
        // Both long edges of a star through the hub get pruned; the
        // snapshot iteration must survive the list shrinking under it.
        let (mut graph, layout) = world(
            &[
                ("Hub", 500.0, 0.0),
                ("A", 0.0, 0.0),
                ("B", 1000.0, 0.0),
                ("A2", 0.0, 200.0),
            ],
            &[("A", "B"), ("A", "Hub"), ("A", "A2"), ("Hub", "B")],
        );
        let removed = prune_collisions(&mut graph, &layout);
        assert!(removed >= 1);
        assert!(!graph.has_edge("A", "B"), "edge through Hub must be pruned");
        assert!(graph.has_edge("A", "Hub"));
        assert!(graph.has_edge("Hub", "B"));
    }
}
