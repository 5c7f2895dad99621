//! HTTP store client
//!
//! Thin client for the external store's bulk endpoints. The store owns
//! its own upsert-or-skip semantics; this client only moves batches
//! and reports what the store says it did.

use super::traits::{BulkOutcome, GraphStore, StorageError, StorageResult};
use crate::graph::{CanonicalEdge, CanonicalNode, Source};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct NodeBatch<'a> {
    nodes: &'a [CanonicalNode],
}

#[derive(Serialize)]
struct EdgeBatch<'a> {
    edges: &'a [CanonicalEdge],
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn check(response: reqwest::Response) -> StorageResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(StorageError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl GraphStore for HttpStore {
    async fn upsert_nodes_bulk(&self, nodes: &[CanonicalNode]) -> StorageResult<BulkOutcome> {
        let response = self
            .client
            .post(format!("{}/nodes/bulk", self.base_url))
            .json(&NodeBatch { nodes })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn upsert_edges_bulk(&self, edges: &[CanonicalEdge]) -> StorageResult<BulkOutcome> {
        let response = self
            .client
            .post(format!("{}/edges/bulk", self.base_url))
            .json(&EdgeBatch { edges })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_existing_edges(
        &self,
        scope: &str,
        source: Source,
    ) -> StorageResult<HashMap<String, CanonicalEdge>> {
        let response = self
            .client
            .get(format!("{}/edges", self.base_url))
            .query(&[("scope", scope), ("source", source.tag())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_edge(&self, edge: &CanonicalEdge) -> StorageResult<()> {
        // Composite ids contain separator characters, so the edge rides
        // in the body rather than the path.
        let response = self
            .client
            .put(format!("{}/edges", self.base_url))
            .json(edge)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
