//! Undirected weighted adjacency-list graph over named stations.
//!
//! Vertex order is insertion order (the run's definition order) and the
//! adjacency map is a `BTreeMap`, so iteration is fully deterministic for a
//! given build — the same guarantee the pathfinding layer and the seeded
//! regression tests rely on.

use std::collections::BTreeMap;
use std::fmt;

/// One endpoint record in an adjacency list: the neighbor's name plus the
/// weight of that specific edge. Both endpoints of an edge carry the same
/// weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    pub name: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge referenced a vertex that was never registered. This is an
    /// orchestration bug, not a runtime data condition.
    UnknownVertex(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownVertex(name) => write!(f, "unknown vertex '{name}'"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Adjacency-list rail graph.
///
/// Invariants: adjacency is symmetric (if B appears in A's list, A appears
/// in B's with equal weight), no self-loops, no duplicate neighbor entries.
#[derive(Debug, Clone, Default)]
pub struct RailGraph {
    vertices: Vec<String>,
    adjacency: BTreeMap<String, Vec<Neighbor>>,
}

impl RailGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph with every name registered as an isolated vertex.
    pub fn with_vertices<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        for name in names {
            graph.add_vertex(name.as_ref());
        }
        graph
    }

    /// Register an isolated vertex. Re-registering an existing name is a
    /// no-op and keeps its edges.
    pub fn add_vertex(&mut self, name: &str) {
        if !self.adjacency.contains_key(name) {
            self.vertices.push(name.to_string());
            self.adjacency.insert(name.to_string(), Vec::new());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// Vertex names in definition order.
    pub fn vertex_names(&self) -> &[String] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Insert the undirected edge `a`-`b` with the given weight.
    ///
    /// Idempotent: if the pair is already connected the existing weight is
    /// kept and the call is a no-op. Self-loops are ignored. Errors if
    /// either name is unregistered.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u32) -> Result<(), GraphError> {
        if !self.adjacency.contains_key(a) {
            return Err(GraphError::UnknownVertex(a.to_string()));
        }
        if !self.adjacency.contains_key(b) {
            return Err(GraphError::UnknownVertex(b.to_string()));
        }
        if a == b {
            return Ok(());
        }
        if self.has_edge(a, b) {
            return Ok(());
        }
        self.adjacency.get_mut(a).unwrap().push(Neighbor {
            name: b.to_string(),
            weight,
        });
        self.adjacency.get_mut(b).unwrap().push(Neighbor {
            name: a.to_string(),
            weight,
        });
        Ok(())
    }

    /// Remove the edge `a`-`b` in both directions; no-op if absent.
    pub fn remove_edge(&mut self, a: &str, b: &str) {
        if let Some(list) = self.adjacency.get_mut(a) {
            list.retain(|n| n.name != b);
        }
        if let Some(list) = self.adjacency.get_mut(b) {
            list.retain(|n| n.name != a);
        }
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|list| list.iter().any(|n| n.name == b))
    }

    /// Adjacency list for `name`; empty for unknown names.
    pub fn neighbors(&self, name: &str) -> &[Neighbor] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, name: &str) -> usize {
        self.neighbors(name).len()
    }

    /// Is every vertex reachable from every other?
    ///
    /// Depth-first traversal from the first vertex with degree >= 1. A
    /// single-vertex graph counts as connected; a multi-vertex graph where
    /// no vertex has an edge does not.
    pub fn is_connected(&self) -> bool {
        if self.vertices.len() <= 1 {
            return true;
        }
        let Some(start) = self.vertices.iter().find(|v| self.degree(v) > 0) else {
            return false;
        };

        let mut visited = std::collections::BTreeSet::new();
        let mut stack = vec![start.as_str()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for neighbor in self.neighbors(current) {
                if !visited.contains(neighbor.name.as_str()) {
                    stack.push(neighbor.name.as_str());
                }
            }
        }
        visited.len() == self.vertices.len()
    }
}
