//! Canonical node representation in the merged knowledge graph

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which connector produced a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Literature annotation connector (document/passage/annotation payloads)
    Literature,
    /// Knowledge-graph connector (message/knowledge-graph payloads)
    KnowledgeGraph,
    /// Query-result connector (results/analyses/edge-binding payloads)
    Bindings,
}

impl Source {
    /// Stable tag used inside composite identifiers and store filters.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Literature => "literature",
            Self::KnowledgeGraph => "knowledge-graph",
            Self::Bindings => "bindings",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::error::Error for Source {}

/// Typed attribute values carried on nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<AttributeValue>),
    Object(HashMap<String, AttributeValue>),
}

/// Attribute collection
pub type Attributes = HashMap<String, AttributeValue>;

/// A canonical node in the merged graph.
///
/// Created once per unique identity; after creation it is only ever
/// mutated to grow its attribute bag, never overwritten wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalNode {
    /// Stable identifier (source-scoped CURIE, e.g. "MESH:D003866")
    pub id: String,
    /// Display label (e.g. "depression")
    pub label: String,
    /// Single resolved display type (e.g. "Gene", "Disease")
    pub display_type: String,
    /// Merged open attribute bag
    pub attributes: Attributes,
    /// Which connector first produced this node
    pub origin: Source,
    /// When this record was materialized
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CanonicalNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        display_type: impl Into<String>,
        origin: Source,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            display_type: display_type.into(),
            attributes: HashMap::new(),
            origin,
            created_at: chrono::Utc::now(),
        }
    }

    /// Add an attribute to the node
    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
