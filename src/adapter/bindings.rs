//! Bindings adapter: results/analyses/edge-binding payloads
//!
//! Shape (c) does not enumerate its knowledge graph directly: result
//! rows bind edge ids through per-result analyses, and only the bound
//! edges (plus whatever their support graphs pull in) are part of the
//! answer. Entities are limited to nodes actually reached by the
//! expansion, unlike shape (b) which takes the whole node dictionary.

use super::expand::{expand_edge, Expansion};
use super::message::entity_from_node;
use super::traits::{AdapterError, SourceAdapter, SourcePayload};
use super::types::ParsedPayload;
use crate::graph::Source;
use tracing::debug;

pub struct BindingsAdapter;

impl SourceAdapter for BindingsAdapter {
    fn source(&self) -> Source {
        Source::Bindings
    }

    fn parse(&self, payload: &SourcePayload) -> Result<ParsedPayload, AdapterError> {
        let SourcePayload::Bindings(payload) = payload else {
            return Err(AdapterError::ShapeMismatch {
                expected: Source::Bindings,
            });
        };
        let message = &payload.message;

        // One visited set carried across every result row.
        let mut expansion = Expansion::new();
        for result in &message.results {
            for analysis in &result.analyses {
                let mut keys: Vec<&String> = analysis.edge_bindings.keys().collect();
                keys.sort();
                for key in keys {
                    for binding in &analysis.edge_bindings[key] {
                        expand_edge(message, &binding.id, &mut expansion);
                    }
                }
            }
        }

        let mut out = ParsedPayload::default();
        for node_id in &expansion.node_ids {
            match message.knowledge_graph.nodes.get(node_id) {
                Some(node) => match entity_from_node(node_id, node) {
                    Some(entity) => out.entities.push(entity),
                    None => {
                        out.dropped += 1;
                        debug!(%node_id, "bound node missing name or categories, dropped");
                    }
                },
                None => {
                    out.dropped += 1;
                    debug!(%node_id, "bound node absent from knowledge graph, dropped");
                }
            }
        }

        for edge_id in &expansion.edge_ids {
            let edge = &message.knowledge_graph.edges[edge_id];
            if edge.is_cooccurrence() {
                out.filtered += 1;
                continue;
            }
            out.relations.push(edge.into());
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::parse_source;

    fn payload(message: serde_json::Value) -> SourcePayload {
        SourcePayload::from_value(Source::Bindings, serde_json::json!({ "message": message }))
            .unwrap()
    }

    #[test]
    fn only_bound_edges_and_their_nodes_are_extracted() {
        let parsed = parse_source(&payload(serde_json::json!({
            "knowledge_graph": {
                "nodes": {
                    "A": { "name": "a", "categories": ["biolink:Gene"] },
                    "B": { "name": "b", "categories": ["biolink:Disease"] },
                    "unbound": { "name": "x", "categories": ["biolink:Drug"] },
                },
                "edges": {
                    "bound": { "subject": "A", "object": "B", "predicate": "biolink:affects" },
                    "stray": { "subject": "A", "object": "unbound", "predicate": "biolink:treats" },
                },
            },
            "results": [{
                "analyses": [{ "edge_bindings": { "e0": [{ "id": "bound" }] } }]
            }]
        })))
        .unwrap();

        let ids: Vec<&str> = parsed.entities.iter().map(|e| e.source_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(parsed.relations.len(), 1);
        assert_eq!(parsed.relations[0].predicate, "biolink:affects");
    }

    #[test]
    fn support_graphs_behind_bound_edges_are_pulled_in() {
        let parsed = parse_source(&payload(serde_json::json!({
            "knowledge_graph": {
                "nodes": {
                    "A": { "name": "a", "categories": ["biolink:Gene"] },
                    "B": { "name": "b", "categories": ["biolink:Disease"] },
                    "C": { "name": "c", "categories": ["biolink:Drug"] },
                },
                "edges": {
                    "inferred": {
                        "subject": "A", "object": "B", "predicate": "biolink:treats",
                        "attributes": [{
                            "attribute_type_id": "biolink:support_graphs",
                            "value": ["ag"],
                        }],
                    },
                    "basis": { "subject": "C", "object": "B", "predicate": "biolink:affects" },
                },
            },
            "auxiliary_graphs": { "ag": { "edges": ["basis"] } },
            "results": [{
                "analyses": [{ "edge_bindings": { "e0": [{ "id": "inferred" }] } }]
            }]
        })))
        .unwrap();

        assert_eq!(parsed.entities.len(), 3);
        assert_eq!(parsed.relations.len(), 2);
    }

    #[test]
    fn missing_bound_node_counts_as_dropped() {
        let parsed = parse_source(&payload(serde_json::json!({
            "knowledge_graph": {
                "nodes": {
                    "A": { "name": "a", "categories": ["biolink:Gene"] },
                },
                "edges": {
                    "bound": { "subject": "A", "object": "ghost", "predicate": "biolink:affects" },
                },
            },
            "results": [{
                "analyses": [{ "edge_bindings": { "e0": [{ "id": "bound" }] } }]
            }]
        })))
        .unwrap();

        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.dropped, 1);
        // The relation is still extracted; the pipeline decides what to
        // do about its missing endpoint.
        assert_eq!(parsed.relations.len(), 1);
    }
}
