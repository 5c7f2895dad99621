//! Knowledge-graph adapter: message/knowledge-graph payloads
//!
//! Shape (b) ships its node and edge dictionaries directly under
//! `message.knowledge_graph`. Every edge is expanded through its
//! support graphs; literature co-occurrence edges are filtered before
//! and after expansion because they assert no biological relationship.

use super::expand::{expand_edge, Expansion};
use super::message::entity_from_node;
use super::traits::{AdapterError, SourceAdapter, SourcePayload};
use super::types::ParsedPayload;
use crate::graph::Source;
use tracing::debug;

pub struct KnowledgeGraphAdapter;

impl SourceAdapter for KnowledgeGraphAdapter {
    fn source(&self) -> Source {
        Source::KnowledgeGraph
    }

    fn parse(&self, payload: &SourcePayload) -> Result<ParsedPayload, AdapterError> {
        let SourcePayload::KnowledgeGraph(payload) = payload else {
            return Err(AdapterError::ShapeMismatch {
                expected: Source::KnowledgeGraph,
            });
        };
        let message = &payload.message;

        let mut out = ParsedPayload::default();
        for (id, node) in &message.knowledge_graph.nodes {
            match entity_from_node(id, node) {
                Some(entity) => out.entities.push(entity),
                None => {
                    out.dropped += 1;
                    debug!(%id, "node missing name or categories, dropped");
                }
            }
        }
        // Dictionary order is arbitrary; sort for a stable extraction order.
        out.entities.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        // One visited set for the whole payload: an edge reachable both
        // directly and through a support path materializes once.
        let mut expansion = Expansion::new();
        let mut entry_ids: Vec<&String> = message.knowledge_graph.edges.keys().collect();
        entry_ids.sort();
        for edge_id in entry_ids {
            let edge = &message.knowledge_graph.edges[edge_id];
            if edge.is_cooccurrence() {
                out.filtered += 1;
                continue;
            }
            expand_edge(message, edge_id, &mut expansion);
        }

        for edge_id in &expansion.edge_ids {
            let edge = &message.knowledge_graph.edges[edge_id];
            if edge.is_cooccurrence() {
                // Reached as support for another edge; still not a claim.
                out.filtered += 1;
                continue;
            }
            out.relations.push(edge.into());
        }

        Ok(out)
    }
}
