//! Store trait definitions
//!
//! The persisted graph lives in an external store reached through bulk
//! upsert/read operations. The engine never assumes more than this
//! interface: upsert-or-skip for inserts, explicit read-merge-write
//! for publication-set growth.

use crate::graph::{CanonicalEdge, CanonicalNode, Source};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store request failed: {0} — is the store reachable?")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("edge not found: {0} — merge target vanished between read and write")]
    EdgeNotFound(String),
}

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What one bulk upsert call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Records that did not exist and were created
    pub created: usize,
    /// Records whose identity already existed and were left in place
    pub skipped: usize,
}

impl BulkOutcome {
    pub fn absorb(&mut self, other: BulkOutcome) {
        self.created += other.created;
        self.skipped += other.skipped;
    }
}

/// Trait for the external persisted graph store.
///
/// Implementations must be thread-safe (Send + Sync); the background
/// continuation path finishes an ingestion on a spawned task.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Insert the nodes that don't exist yet; skip the ones that do.
    async fn upsert_nodes_bulk(&self, nodes: &[CanonicalNode]) -> StorageResult<BulkOutcome>;

    /// Insert the edges that don't exist yet; skip the ones that do.
    async fn upsert_edges_bulk(&self, edges: &[CanonicalEdge]) -> StorageResult<BulkOutcome>;

    /// Read stored edges for one scope and connector, keyed by
    /// composite id. Used for merge-before-insert.
    async fn get_existing_edges(
        &self,
        scope: &str,
        source: Source,
    ) -> StorageResult<HashMap<String, CanonicalEdge>>;

    /// Write back one edge whose evidence grew.
    async fn update_edge(&self, edge: &CanonicalEdge) -> StorageResult<()>;
}
