//! Intermediate extraction types shared by all source adapters
//!
//! Adapters lower their external payload shape into `{entities,
//! relations}`; everything downstream (identity, dedup, filtering,
//! persistence) works on these and never sees the wire shapes.

use crate::graph::Attributes;
use serde::{Deserialize, Serialize};

/// A structured modifier refining a relation's predicate.
///
/// Field names follow the wire shape so qualifier lists deserialize
/// directly off knowledge-graph edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    /// Qualifier kind (e.g. "biolink:object_aspect_qualifier")
    pub qualifier_type_id: String,
    /// Qualifier value (e.g. "activity", "increased")
    pub qualifier_value: String,
}

impl Qualifier {
    pub fn new(type_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            qualifier_type_id: type_id.into(),
            qualifier_value: value.into(),
        }
    }
}

/// Role a resource played in asserting a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceRole {
    /// Originally asserted the relationship
    Primary,
    /// Passed the assertion through
    Aggregator,
    /// Any other role (supporting data source, etc.)
    Other,
}

impl EvidenceRole {
    /// Map a wire-level resource role string onto the taxonomy.
    pub fn from_wire(role: &str) -> Self {
        match role {
            "primary_knowledge_source" => Self::Primary,
            "aggregator_knowledge_source" => Self::Aggregator,
            _ => Self::Other,
        }
    }
}

/// One provenance entry on a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    pub role: EvidenceRole,
    /// Resource identifier (e.g. "infores:semmeddb")
    pub resource_id: String,
}

/// An entity as extracted from one payload. Transient: exists only
/// within a single ingestion call.
#[derive(Debug, Clone, Default)]
pub struct RawEntity {
    /// Source-scoped identifier (CURIE)
    pub source_id: String,
    /// Display name
    pub name: String,
    /// Ordered category tags, most specific first
    pub categories: Vec<String>,
    /// Open attribute map
    pub attributes: Attributes,
}

/// A relation as extracted from one payload. Transient.
#[derive(Debug, Clone, Default)]
pub struct RawRelation {
    pub subject_id: String,
    pub object_id: String,
    pub predicate: String,
    /// Ordered qualifier list
    pub qualifiers: Vec<Qualifier>,
    /// Provenance entries, wire order preserved
    pub evidence: Vec<EvidenceRef>,
    /// Supporting publications
    pub publications: Vec<String>,
}

impl RawRelation {
    /// The primary knowledge source, if any evidence entry carries one.
    pub fn primary_source(&self) -> Option<&str> {
        self.evidence
            .iter()
            .find(|e| e.role == EvidenceRole::Primary)
            .map(|e| e.resource_id.as_str())
    }

    /// Aggregator resource ids in wire order.
    pub fn aggregator_chain(&self) -> Vec<String> {
        self.evidence
            .iter()
            .filter(|e| e.role == EvidenceRole::Aggregator)
            .map(|e| e.resource_id.clone())
            .collect()
    }
}

/// What one adapter pass produced.
#[derive(Debug, Clone, Default)]
pub struct ParsedPayload {
    pub entities: Vec<RawEntity>,
    pub relations: Vec<RawRelation>,
    /// Records dropped for missing required fields. Non-fatal by
    /// policy: a bad record never aborts the batch.
    pub dropped: usize,
    /// Edges dropped by the literature co-occurrence filter.
    pub filtered: usize,
}

impl ParsedPayload {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_role_maps_wire_strings() {
        assert_eq!(
            EvidenceRole::from_wire("primary_knowledge_source"),
            EvidenceRole::Primary
        );
        assert_eq!(
            EvidenceRole::from_wire("aggregator_knowledge_source"),
            EvidenceRole::Aggregator
        );
        assert_eq!(
            EvidenceRole::from_wire("supporting_data_source"),
            EvidenceRole::Other
        );
    }

    #[test]
    fn relation_extracts_primary_and_aggregators() {
        let relation = RawRelation {
            evidence: vec![
                EvidenceRef {
                    role: EvidenceRole::Aggregator,
                    resource_id: "infores:hub".into(),
                },
                EvidenceRef {
                    role: EvidenceRole::Primary,
                    resource_id: "infores:semmeddb".into(),
                },
                EvidenceRef {
                    role: EvidenceRole::Aggregator,
                    resource_id: "infores:portal".into(),
                },
            ],
            ..Default::default()
        };

        assert_eq!(relation.primary_source(), Some("infores:semmeddb"));
        assert_eq!(
            relation.aggregator_chain(),
            vec!["infores:hub".to_string(), "infores:portal".into()]
        );
    }
}
