//! In-memory store
//!
//! Backs local runs and tests. Mirrors the external store's contract:
//! upsert-or-skip inserts, whole-record updates only through
//! `update_edge`.

use super::traits::{BulkOutcome, GraphStore, StorageError, StorageResult};
use crate::graph::{CanonicalEdge, CanonicalNode, Source};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: DashMap<String, CanonicalNode>,
    edges: DashMap<String, CanonicalEdge>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn get_node(&self, id: &str) -> Option<CanonicalNode> {
        self.nodes.get(id).map(|r| r.clone())
    }

    pub fn get_edge(&self, id: &str) -> Option<CanonicalEdge> {
        self.edges.get(id).map(|r| r.clone())
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn upsert_nodes_bulk(&self, nodes: &[CanonicalNode]) -> StorageResult<BulkOutcome> {
        let mut outcome = BulkOutcome::default();
        for node in nodes {
            if self.nodes.contains_key(&node.id) {
                outcome.skipped += 1;
            } else {
                self.nodes.insert(node.id.clone(), node.clone());
                outcome.created += 1;
            }
        }
        Ok(outcome)
    }

    async fn upsert_edges_bulk(&self, edges: &[CanonicalEdge]) -> StorageResult<BulkOutcome> {
        let mut outcome = BulkOutcome::default();
        for edge in edges {
            if self.edges.contains_key(&edge.id) {
                outcome.skipped += 1;
            } else {
                self.edges.insert(edge.id.clone(), edge.clone());
                outcome.created += 1;
            }
        }
        Ok(outcome)
    }

    async fn get_existing_edges(
        &self,
        scope: &str,
        source: Source,
    ) -> StorageResult<HashMap<String, CanonicalEdge>> {
        let prefix = format!("{}|{}|", scope, source.tag());
        Ok(self
            .edges
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }

    async fn update_edge(&self, edge: &CanonicalEdge) -> StorageResult<()> {
        match self.edges.get_mut(&edge.id) {
            Some(mut stored) => {
                *stored = edge.clone();
                Ok(())
            }
            None => Err(StorageError::EdgeNotFound(edge.id.clone())),
        }
    }
}
