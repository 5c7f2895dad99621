//! Multi-seed neighborhood filtering
//!
//! When an expansion starts from several seed nodes at once, the
//! interesting neighbors are the ones bridging the seeds, not every
//! one-off neighbor of any single seed. A neighbor survives only if it
//! connects to at least two distinct seeds; edges to excluded
//! neighbors are dropped with it.

use crate::graph::CanonicalEdge;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Minimum distinct seeds a neighbor must connect to survive.
const MIN_BRIDGING_SEEDS: usize = 2;

/// What the filter kept and what it discarded.
#[derive(Debug)]
pub struct NeighborhoodResult {
    /// Neighbors connected to two or more distinct seeds
    pub retained_neighbors: HashSet<String>,
    /// Surviving edges (seed → retained neighbor, or seed → seed)
    pub edges: Vec<CanonicalEdge>,
    /// Edges dropped because their neighbor was excluded
    pub dropped_edges: usize,
}

/// Filter a one-hop neighborhood down to its bridge nodes.
///
/// `edges` is the resolved edge set where the subject is a seed. Edges
/// between two seeds always survive: both endpoints were asked for
/// explicitly.
pub fn filter_bridging(seeds: &HashSet<String>, edges: Vec<CanonicalEdge>) -> NeighborhoodResult {
    let mut seeds_per_neighbor: HashMap<&str, HashSet<&str>> = HashMap::new();
    for edge in edges.iter().filter(|e| seeds.contains(&e.subject)) {
        if !seeds.contains(&edge.object) {
            seeds_per_neighbor
                .entry(edge.object.as_str())
                .or_default()
                .insert(edge.subject.as_str());
        }
    }

    let retained_neighbors: HashSet<String> = seeds_per_neighbor
        .iter()
        .filter(|(_, connected)| connected.len() >= MIN_BRIDGING_SEEDS)
        .map(|(neighbor, _)| neighbor.to_string())
        .collect();

    let total = edges.len();
    let edges: Vec<CanonicalEdge> = edges
        .into_iter()
        .filter(|e| {
            seeds.contains(&e.subject)
                && (seeds.contains(&e.object) || retained_neighbors.contains(&e.object))
        })
        .collect();
    let dropped_edges = total - edges.len();

    debug!(
        retained = retained_neighbors.len(),
        dropped_edges, "neighborhood filter applied"
    );

    NeighborhoodResult {
        retained_neighbors,
        edges,
        dropped_edges,
    }
}
