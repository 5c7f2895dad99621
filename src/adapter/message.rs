//! Wire types for the message/knowledge-graph payload family
//!
//! Shapes (b) and (c) are both trees rooted at a `message` object with
//! `knowledge_graph.{nodes,edges}` dictionaries, optional
//! `auxiliary_graphs`, and optional `results`. These shapes are owned
//! by the external services and treated as immutable contracts; all
//! fields deserialize leniently so a sparse payload still parses.

use super::types::Qualifier;
use serde::Deserialize;
use std::collections::HashMap;

/// Attribute id carrying a publication list on an edge.
pub const PUBLICATIONS_ATTRIBUTE: &str = "biolink:publications";
/// Attribute id referencing auxiliary support graphs on an edge.
pub const SUPPORT_GRAPHS_ATTRIBUTE: &str = "biolink:support_graphs";
/// Predicate asserting only that two entities co-occur in literature.
/// Not a biological claim, so these edges are never persisted.
pub const COOCCURRENCE_PREDICATE: &str = "biolink:occurs_together_in_literature_with";

/// Top-level envelope of shapes (b) and (c).
#[derive(Debug, Clone, Deserialize)]
pub struct GraphPayload {
    pub message: Message,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub knowledge_graph: KnowledgeGraph,
    #[serde(default)]
    pub auxiliary_graphs: HashMap<String, AuxiliaryGraph>,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: HashMap<String, KgNode>,
    #[serde(default)]
    pub edges: HashMap<String, KgEdge>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KgNode {
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<KgAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KgEdge {
    pub subject: String,
    pub object: String,
    pub predicate: String,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
    #[serde(default)]
    pub attributes: Vec<KgAttribute>,
}

impl KgEdge {
    fn attribute_strings(&self, type_id: &str) -> Vec<String> {
        let mut out = Vec::new();
        for attr in self.attributes.iter().filter(|a| a.attribute_type_id == type_id) {
            match &attr.value {
                serde_json::Value::String(s) => out.push(s.clone()),
                serde_json::Value::Array(items) => out.extend(
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string)),
                ),
                _ => {}
            }
        }
        out
    }

    /// Publication CURIEs attached to this edge.
    pub fn publications(&self) -> Vec<String> {
        self.attribute_strings(PUBLICATIONS_ATTRIBUTE)
    }

    /// Auxiliary graph ids this edge cites as support.
    pub fn support_graphs(&self) -> Vec<String> {
        self.attribute_strings(SUPPORT_GRAPHS_ATTRIBUTE)
    }

    /// True for the literature co-occurrence predicate.
    pub fn is_cooccurrence(&self) -> bool {
        self.predicate == COOCCURRENCE_PREDICATE
    }
}

impl From<&KgEdge> for super::types::RawRelation {
    fn from(edge: &KgEdge) -> Self {
        Self {
            subject_id: edge.subject.clone(),
            object_id: edge.object.clone(),
            predicate: edge.predicate.clone(),
            qualifiers: edge.qualifiers.clone(),
            evidence: edge
                .sources
                .iter()
                .map(|s| super::types::EvidenceRef {
                    role: super::types::EvidenceRole::from_wire(&s.resource_role),
                    resource_id: s.resource_id.clone(),
                })
                .collect(),
            publications: edge.publications(),
        }
    }
}

/// Lower one knowledge-graph node entry into a raw entity.
///
/// Returns None when the record is missing its name or categories —
/// the caller counts the drop.
pub fn entity_from_node(id: &str, node: &KgNode) -> Option<super::types::RawEntity> {
    let name = node.name.as_ref().filter(|n| !n.is_empty())?;
    if node.categories.is_empty() {
        return None;
    }
    Some(super::types::RawEntity {
        source_id: id.to_string(),
        name: name.clone(),
        categories: node.categories.clone(),
        attributes: std::collections::HashMap::new(),
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    pub resource_id: String,
    pub resource_role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KgAttribute {
    pub attribute_type_id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// A secondary edge set justifying an inferred edge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuxiliaryGraph {
    #[serde(default)]
    pub edges: Vec<String>,
}

/// One result row: bindings into the knowledge-graph dictionaries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultEntry {
    #[serde(default)]
    pub node_bindings: HashMap<String, Vec<Binding>>,
    #[serde(default)]
    pub analyses: Vec<Analysis>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub edge_bindings: HashMap<String, Vec<Binding>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_publication_attributes_flatten_strings_and_arrays() {
        let edge: KgEdge = serde_json::from_value(serde_json::json!({
            "subject": "NCBIGene:2099",
            "object": "MESH:D003866",
            "predicate": "biolink:affects",
            "attributes": [
                { "attribute_type_id": "biolink:publications", "value": ["PMID:1", "PMID:2"] },
                { "attribute_type_id": "biolink:publications", "value": "PMID:3" },
                { "attribute_type_id": "biolink:knowledge_level", "value": "prediction" }
            ]
        }))
        .unwrap();

        assert_eq!(
            edge.publications(),
            vec!["PMID:1".to_string(), "PMID:2".into(), "PMID:3".into()]
        );
        assert!(edge.support_graphs().is_empty());
    }

    #[test]
    fn sparse_message_deserializes_with_defaults() {
        let payload: GraphPayload =
            serde_json::from_value(serde_json::json!({ "message": {} })).unwrap();
        assert!(payload.message.knowledge_graph.nodes.is_empty());
        assert!(payload.message.auxiliary_graphs.is_empty());
        assert!(payload.message.results.is_empty());
    }
}
