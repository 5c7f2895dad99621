//! Recursive support-graph expansion
//!
//! An edge may cite auxiliary graphs whose own edges may cite further
//! auxiliary graphs. Expansion resolves one edge reference into the
//! flat set of every node and edge reachable through that chain,
//! depth-first. A visited-edge-id set is threaded through the whole
//! traversal: support chains in the wild do loop back on themselves,
//! and the guard is what makes a self-referencing auxiliary graph
//! terminate instead of recursing unboundedly.

use super::message::Message;
use std::collections::HashSet;
use tracing::debug;

/// Accumulator for one expansion traversal.
///
/// Collections grow incrementally as the traversal walks; `node_ids`
/// and `edge_ids` preserve first-visit order and contain no duplicates
/// even when a node or edge is reachable via multiple support paths.
#[derive(Debug, Default)]
pub struct Expansion {
    /// Node ids in first-visit order
    pub node_ids: Vec<String>,
    /// Edge ids in first-visit order
    pub edge_ids: Vec<String>,
    visited_edges: HashSet<String>,
    seen_nodes: HashSet<String>,
}

impl Expansion {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many distinct edges the traversal has visited.
    pub fn visited_count(&self) -> usize {
        self.visited_edges.len()
    }

    fn record_node(&mut self, node_id: &str) {
        if self.seen_nodes.insert(node_id.to_string()) {
            self.node_ids.push(node_id.to_string());
        }
    }
}

/// Expand one edge reference into `out`, following support graphs
/// recursively.
///
/// Unknown edge or auxiliary-graph ids are skipped: a payload citing a
/// support graph it never shipped is that service's defect, not a
/// reason to abort the caller's batch.
pub fn expand_edge(message: &Message, edge_id: &str, out: &mut Expansion) {
    if !out.visited_edges.insert(edge_id.to_string()) {
        return;
    }

    let Some(edge) = message.knowledge_graph.edges.get(edge_id) else {
        debug!(edge_id, "edge reference not present in knowledge graph, skipping");
        return;
    };

    out.record_node(&edge.subject);
    out.record_node(&edge.object);
    out.edge_ids.push(edge_id.to_string());

    for graph_id in edge.support_graphs() {
        let Some(aux) = message.auxiliary_graphs.get(&graph_id) else {
            debug!(%graph_id, "auxiliary graph reference missing, skipping");
            continue;
        };
        for support_edge_id in &aux.edges {
            expand_edge(message, support_edge_id, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::message::GraphPayload;

    fn message_with(payload: serde_json::Value) -> Message {
        let envelope: GraphPayload =
            serde_json::from_value(serde_json::json!({ "message": payload })).unwrap();
        envelope.message
    }

    fn edge(subject: &str, object: &str, support: &[&str]) -> serde_json::Value {
        let mut value = serde_json::json!({
            "subject": subject,
            "object": object,
            "predicate": "biolink:affects",
        });
        if !support.is_empty() {
            value["attributes"] = serde_json::json!([{
                "attribute_type_id": "biolink:support_graphs",
                "value": support,
            }]);
        }
        value
    }

    #[test]
    fn flat_edge_collects_both_endpoints() {
        let message = message_with(serde_json::json!({
            "knowledge_graph": {
                "nodes": {},
                "edges": { "e1": edge("A", "B", &[]) }
            }
        }));

        let mut out = Expansion::new();
        expand_edge(&message, "e1", &mut out);

        assert_eq!(out.node_ids, vec!["A", "B"]);
        assert_eq!(out.edge_ids, vec!["e1"]);
    }

    #[test]
    fn support_graphs_expand_recursively() {
        let message = message_with(serde_json::json!({
            "knowledge_graph": {
                "edges": {
                    "e1": edge("A", "B", &["ag1"]),
                    "e2": edge("B", "C", &["ag2"]),
                    "e3": edge("C", "D", &[]),
                }
            },
            "auxiliary_graphs": {
                "ag1": { "edges": ["e2"] },
                "ag2": { "edges": ["e3"] },
            }
        }));

        let mut out = Expansion::new();
        expand_edge(&message, "e1", &mut out);

        assert_eq!(out.edge_ids, vec!["e1", "e2", "e3"]);
        assert_eq!(out.node_ids, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn self_referencing_support_chain_terminates() {
        // ag1 supports e1 with e2; ag2 supports e2 with e1 — an
        // indirect cycle back to the entry edge.
        let message = message_with(serde_json::json!({
            "knowledge_graph": {
                "edges": {
                    "e1": edge("A", "B", &["ag1"]),
                    "e2": edge("B", "C", &["ag2"]),
                }
            },
            "auxiliary_graphs": {
                "ag1": { "edges": ["e2"] },
                "ag2": { "edges": ["e1"] },
            }
        }));

        let mut out = Expansion::new();
        expand_edge(&message, "e1", &mut out);

        assert_eq!(out.visited_count(), 2);
        assert_eq!(out.edge_ids, vec!["e1", "e2"]);
    }

    #[test]
    fn shared_support_path_materializes_edges_once() {
        // Both entry edges cite the same support graph.
        let message = message_with(serde_json::json!({
            "knowledge_graph": {
                "edges": {
                    "e1": edge("A", "B", &["shared"]),
                    "e2": edge("A", "C", &["shared"]),
                    "e3": edge("B", "C", &[]),
                }
            },
            "auxiliary_graphs": {
                "shared": { "edges": ["e3"] },
            }
        }));

        let mut out = Expansion::new();
        expand_edge(&message, "e1", &mut out);
        expand_edge(&message, "e2", &mut out);

        assert_eq!(out.edge_ids, vec!["e1", "e3", "e2"]);
        assert_eq!(out.node_ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let message = message_with(serde_json::json!({
            "knowledge_graph": {
                "edges": { "e1": edge("A", "B", &["missing-graph"]) }
            }
        }));

        let mut out = Expansion::new();
        expand_edge(&message, "e1", &mut out);
        expand_edge(&message, "missing-edge", &mut out);

        assert_eq!(out.edge_ids, vec!["e1"]);
    }
}
