//! Batch upsert client
//!
//! Splits a collection into `ceil(n / batch_size)` sequential batches
//! and aggregates what the store reports. A failed batch is counted
//! and the next batch proceeds: bulk commit here is best-effort, not
//! an all-or-nothing transaction across the whole input.

use super::traits::{BulkOutcome, GraphStore};
use crate::graph::{CanonicalEdge, CanonicalNode};
use serde::Serialize;
use tracing::warn;

/// Aggregated result of one batched upsert pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    pub created: usize,
    pub skipped: usize,
    /// Batches the store refused; their records are neither created
    /// nor skipped
    pub failed_batches: usize,
    /// Records handed to this pass, including those in failed batches
    pub total: usize,
}

impl UpsertSummary {
    fn absorb(&mut self, outcome: BulkOutcome) {
        self.created += outcome.created;
        self.skipped += outcome.skipped;
    }
}

/// Commits normalized records to the store in bounded batches.
pub struct BatchUpserter<'a> {
    store: &'a dyn GraphStore,
    batch_size: usize,
}

impl<'a> BatchUpserter<'a> {
    pub fn new(store: &'a dyn GraphStore, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    pub async fn upsert_nodes(&self, nodes: &[CanonicalNode]) -> UpsertSummary {
        let mut summary = UpsertSummary {
            total: nodes.len(),
            ..Default::default()
        };
        for batch in nodes.chunks(self.batch_size) {
            match self.store.upsert_nodes_bulk(batch).await {
                Ok(outcome) => summary.absorb(outcome),
                Err(err) => {
                    summary.failed_batches += 1;
                    warn!(batch_len = batch.len(), error = %err, "node batch failed, continuing");
                }
            }
        }
        summary
    }

    pub async fn upsert_edges(&self, edges: &[CanonicalEdge]) -> UpsertSummary {
        let mut summary = UpsertSummary {
            total: edges.len(),
            ..Default::default()
        };
        for batch in edges.chunks(self.batch_size) {
            match self.store.upsert_edges_bulk(batch).await {
                Ok(outcome) => summary.absorb(outcome),
                Err(err) => {
                    summary.failed_batches += 1;
                    warn!(batch_len = batch.len(), error = %err, "edge batch failed, continuing");
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CanonicalNode, EvidenceBundle, Source};
    use crate::storage::{MemoryStore, StorageError, StorageResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn nodes(n: usize) -> Vec<CanonicalNode> {
        (0..n)
            .map(|i| CanonicalNode::new(format!("N:{}", i), "n", "Gene", Source::Literature))
            .collect()
    }

    /// Fails every second node batch.
    struct FlakyStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GraphStore for FlakyStore {
        async fn upsert_nodes_bulk(&self, batch: &[CanonicalNode]) -> StorageResult<BulkOutcome> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                return Err(StorageError::Rejected {
                    status: 503,
                    detail: "overloaded".into(),
                });
            }
            self.inner.upsert_nodes_bulk(batch).await
        }

        async fn upsert_edges_bulk(
            &self,
            batch: &[crate::graph::CanonicalEdge],
        ) -> StorageResult<BulkOutcome> {
            self.inner.upsert_edges_bulk(batch).await
        }

        async fn get_existing_edges(
            &self,
            scope: &str,
            source: Source,
        ) -> StorageResult<HashMap<String, crate::graph::CanonicalEdge>> {
            self.inner.get_existing_edges(scope, source).await
        }

        async fn update_edge(&self, edge: &crate::graph::CanonicalEdge) -> StorageResult<()> {
            self.inner.update_edge(edge).await
        }
    }

    #[tokio::test]
    async fn input_splits_into_ceil_batches() {
        let store = MemoryStore::new();
        let upserter = BatchUpserter::new(&store, 4);

        let summary = upserter.upsert_nodes(&nodes(10)).await;
        assert_eq!(summary.created, 10);
        assert_eq!(summary.failed_batches, 0);
        assert_eq!(summary.total, 10);
        assert_eq!(store.node_count(), 10);
    }

    #[tokio::test]
    async fn failed_batch_does_not_stop_the_rest() {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            calls: AtomicUsize::new(0),
        };
        let upserter = BatchUpserter::new(&store, 2);

        // 6 nodes, batch size 2: batches 1 and 3 land, batch 2 fails.
        let summary = upserter.upsert_nodes(&nodes(6)).await;
        assert_eq!(summary.created, 4);
        assert_eq!(summary.failed_batches, 1);
        assert_eq!(summary.total, 6);
        assert_eq!(store.inner.node_count(), 4);
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped() {
        let store = MemoryStore::new();
        let upserter = BatchUpserter::new(&store, 0);
        let summary = upserter.upsert_nodes(&nodes(3)).await;
        assert_eq!(summary.created, 3);
    }

    #[tokio::test]
    async fn upsert_edges_aggregates_outcomes() {
        let store = MemoryStore::new();
        let upserter = BatchUpserter::new(&store, 2);
        let edge = crate::graph::CanonicalEdge::new(
            "main",
            Source::KnowledgeGraph,
            "A",
            "B",
            "affects",
            EvidenceBundle::default(),
        );

        let first = upserter.upsert_edges(std::slice::from_ref(&edge)).await;
        assert_eq!(first.created, 1);

        let second = upserter.upsert_edges(std::slice::from_ref(&edge)).await;
        assert_eq!(second.skipped, 1);
    }
}
