//! Per-call ingestion context
//!
//! Every ingestion call owns one `IngestContext`: its node cache, its
//! pending edge map, and its counters. Nothing here outlives the call,
//! so two overlapping ingestions never see each other's partial state.

use super::edge::CanonicalEdge;
use super::node::{CanonicalNode, Source};
use std::collections::HashMap;
use uuid::Uuid;

/// Counters accumulated over one ingestion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestCounters {
    /// Records dropped for missing id, name, or type
    pub dropped_records: usize,
    /// Within-call edge collisions folded into an existing pending edge
    pub folded_edges: usize,
    /// Edges whose publication set was merged into a stored edge
    pub merged_edges: usize,
    /// Publication-set merge writes that failed and were skipped
    pub merge_conflicts: usize,
    /// Edges dropped by the literature co-occurrence filter
    pub cooccurrence_filtered: usize,
    /// Nodes dropped by the multi-seed neighborhood filter
    pub neighbors_filtered: usize,
}

/// State owned by a single ingestion call.
///
/// Nodes are keyed by canonical id, pending edges by composite id, so
/// a payload that mentions the same entity or assertion repeatedly
/// materializes it exactly once.
#[derive(Debug)]
pub struct IngestContext {
    /// Correlation id for logs and background-completion notices
    pub call_id: Uuid,
    /// Graph scope all identities are computed under
    pub graph_scope: String,
    /// Which connector is running this call
    pub data_source: Source,
    /// Canonical nodes resolved so far, keyed by node id
    pub nodes: HashMap<String, CanonicalNode>,
    /// Canonical edges pending insert, keyed by composite id
    pub edges: HashMap<String, CanonicalEdge>,
    /// Stored edges whose publication sets grew and need an update write
    pub edge_updates: Vec<CanonicalEdge>,
    /// Call counters
    pub counters: IngestCounters,
}

impl IngestContext {
    pub fn new(graph_scope: impl Into<String>, data_source: Source) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            graph_scope: graph_scope.into(),
            data_source,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            edge_updates: Vec::new(),
            counters: IngestCounters::default(),
        }
    }

    /// Cache a resolved node. First resolution wins; later duplicates
    /// only merge their attribute bags in.
    pub fn add_node(&mut self, node: CanonicalNode) {
        self.nodes
            .entry(node.id.clone())
            .and_modify(|existing| {
                for (k, v) in &node.attributes {
                    existing.attributes.entry(k.clone()).or_insert_with(|| v.clone());
                }
            })
            .or_insert(node);
    }

    /// Queue an edge for insert. A within-call collision on the
    /// composite id folds the new publication set into the pending edge
    /// instead of queueing a duplicate.
    pub fn add_edge(&mut self, edge: CanonicalEdge) {
        match self.edges.get_mut(&edge.id) {
            Some(pending) => {
                pending.merge_publications(&edge.evidence.publications);
                self.counters.folded_edges += 1;
            }
            None => {
                self.edges.insert(edge.id.clone(), edge);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
