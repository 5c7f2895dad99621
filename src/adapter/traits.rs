//! Source adapter contract and payload dispatch
//!
//! The three external shapes arrive as a tagged union; dispatch picks
//! the matching adapter by tag, never by probing the payload's shape
//! at runtime.

use super::document::DocumentPayload;
use super::message::GraphPayload;
use super::types::ParsedPayload;
use crate::graph::Source;
use thiserror::Error;

/// Errors from adapter parsing (not from individual record drops,
/// which are counted and non-fatal).
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("payload does not match the {expected} source shape — check which connector produced it")]
    ShapeMismatch { expected: Source },

    #[error("malformed {source} payload: {detail} — check the payload against the service schema")]
    Malformed { source: Source, detail: String },

    #[error("empty payload — nothing to ingest")]
    Empty,
}

/// One raw payload tagged with the source that produced it.
#[derive(Debug, Clone)]
pub enum SourcePayload {
    /// Shape (a): document/passage/annotation tree
    Literature(DocumentPayload),
    /// Shape (b): message/knowledge-graph tree
    KnowledgeGraph(GraphPayload),
    /// Shape (c): results/analyses/edge-binding indirection tree
    Bindings(GraphPayload),
}

impl SourcePayload {
    /// Deserialize a raw JSON value as the named source's shape.
    pub fn from_value(source: Source, value: serde_json::Value) -> Result<Self, AdapterError> {
        let malformed = |e: serde_json::Error| AdapterError::Malformed {
            source,
            detail: e.to_string(),
        };
        match source {
            Source::Literature => Ok(Self::Literature(
                serde_json::from_value(value).map_err(malformed)?,
            )),
            Source::KnowledgeGraph => Ok(Self::KnowledgeGraph(
                serde_json::from_value(value).map_err(malformed)?,
            )),
            Source::Bindings => Ok(Self::Bindings(
                serde_json::from_value(value).map_err(malformed)?,
            )),
        }
    }

    pub fn source(&self) -> Source {
        match self {
            Self::Literature(_) => Source::Literature,
            Self::KnowledgeGraph(_) => Source::KnowledgeGraph,
            Self::Bindings(_) => Source::Bindings,
        }
    }
}

/// The contract source adapters implement.
///
/// `parse` lowers one raw payload into `{entities, relations}`. A
/// record missing required fields (id, name, or type) is dropped and
/// counted; it never aborts the adapter.
pub trait SourceAdapter: Send + Sync {
    /// Which source shape this adapter consumes
    fn source(&self) -> Source;

    /// Lower a raw payload into the intermediate form.
    fn parse(&self, payload: &SourcePayload) -> Result<ParsedPayload, AdapterError>;
}

/// Dispatch a tagged payload to its matching adapter.
pub fn parse_source(payload: &SourcePayload) -> Result<ParsedPayload, AdapterError> {
    use super::bindings::BindingsAdapter;
    use super::document::DocumentAdapter;
    use super::knowledge_graph::KnowledgeGraphAdapter;

    match payload.source() {
        Source::Literature => DocumentAdapter.parse(payload),
        Source::KnowledgeGraph => KnowledgeGraphAdapter.parse(payload),
        Source::Bindings => BindingsAdapter.parse(payload),
    }
}
