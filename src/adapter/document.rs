//! Literature adapter: document/passage/annotation payloads
//!
//! Shape (a) is a tree of documents, each holding passages with inline
//! entity annotations plus document-level relations. Entity extraction
//! is deliberately restricted to the title and abstract passages —
//! full-body annotations are far noisier, and precision wins over
//! recall here.

use super::traits::{AdapterError, SourceAdapter, SourcePayload};
use super::types::{EvidenceRef, EvidenceRole, ParsedPayload, RawEntity, RawRelation};
use crate::graph::Source;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Primary knowledge source recorded on literature relations.
const LITERATURE_RESOURCE: &str = "infores:pubtator3";

/// Passage types entities are extracted from.
const TRUSTED_PASSAGE_TYPES: &[&str] = &["title", "abstract"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPayload {
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    pub id: Option<String>,
    #[serde(default)]
    pub passages: Vec<Passage>,
    #[serde(default)]
    pub relations: Vec<DocRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Passage {
    #[serde(default)]
    pub infons: HashMap<String, String>,
    #[serde(default)]
    pub annotations: Vec<DocAnnotation>,
    pub text: Option<String>,
}

impl Passage {
    fn is_trusted(&self) -> bool {
        self.infons
            .get("type")
            .map(|t| TRUSTED_PASSAGE_TYPES.contains(&t.as_str()))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocAnnotation {
    pub text: Option<String>,
    #[serde(default)]
    pub infons: HashMap<String, String>,
}

/// A document-level relation. Endpoints arrive as "Type|CURIE" role
/// strings in the infons map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocRelation {
    #[serde(default)]
    pub infons: HashMap<String, String>,
}

/// Map terse wire verbs onto readable predicates.
fn predicate_label(wire: &str) -> String {
    match wire {
        "associate" => "associated with".to_string(),
        "cause" => "causes".to_string(),
        "treat" => "treats".to_string(),
        "inhibit" => "inhibits".to_string(),
        "stimulate" => "stimulates".to_string(),
        "interact" => "interacts with".to_string(),
        "prevent" => "prevents".to_string(),
        other => super::qualifier::clean_term(other),
    }
}

/// Split a "Type|CURIE" role string into its CURIE, rejecting entries
/// with either half missing.
fn role_curie(role: &str) -> Option<&str> {
    let (kind, curie) = role.split_once('|')?;
    if kind.is_empty() || curie.is_empty() {
        return None;
    }
    Some(curie)
}

pub struct DocumentAdapter;

impl DocumentAdapter {
    fn parse_document(&self, doc: &Document, out: &mut ParsedPayload) {
        let publication = doc.id.as_deref().map(|id| {
            if id.starts_with("PMID:") {
                id.to_string()
            } else {
                format!("PMID:{}", id)
            }
        });

        for passage in doc.passages.iter().filter(|p| p.is_trusted()) {
            for annotation in &passage.annotations {
                match self.parse_annotation(annotation) {
                    Some(entity) => out.entities.push(entity),
                    None => {
                        out.dropped += 1;
                        debug!(text = ?annotation.text, "annotation missing required fields, dropped");
                    }
                }
            }
        }

        for relation in &doc.relations {
            match self.parse_relation(relation, publication.as_deref()) {
                Some(relation) => out.relations.push(relation),
                None => {
                    out.dropped += 1;
                    debug!("relation missing role or predicate infons, dropped");
                }
            }
        }
    }

    fn parse_annotation(&self, annotation: &DocAnnotation) -> Option<RawEntity> {
        let identifier = annotation
            .infons
            .get("identifier")
            .filter(|id| !id.is_empty() && *id != "-")?;
        let kind = annotation.infons.get("type").filter(|t| !t.is_empty())?;
        let name = annotation
            .infons
            .get("name")
            .cloned()
            .or_else(|| annotation.text.clone())
            .filter(|n| !n.is_empty())?;

        Some(RawEntity {
            source_id: identifier.clone(),
            name,
            categories: vec![format!("biolink:{}", kind)],
            attributes: HashMap::new(),
        })
    }

    fn parse_relation(
        &self,
        relation: &DocRelation,
        publication: Option<&str>,
    ) -> Option<RawRelation> {
        let predicate = relation.infons.get("type").filter(|t| !t.is_empty())?;
        let subject_id = role_curie(relation.infons.get("role1")?)?;
        let object_id = role_curie(relation.infons.get("role2")?)?;

        Some(RawRelation {
            subject_id: subject_id.to_string(),
            object_id: object_id.to_string(),
            predicate: predicate_label(predicate),
            qualifiers: Vec::new(),
            evidence: vec![EvidenceRef {
                role: EvidenceRole::Primary,
                resource_id: LITERATURE_RESOURCE.to_string(),
            }],
            publications: publication.map(str::to_string).into_iter().collect(),
        })
    }
}

impl SourceAdapter for DocumentAdapter {
    fn source(&self) -> Source {
        Source::Literature
    }

    fn parse(&self, payload: &SourcePayload) -> Result<ParsedPayload, AdapterError> {
        let SourcePayload::Literature(payload) = payload else {
            return Err(AdapterError::ShapeMismatch {
                expected: Source::Literature,
            });
        };

        let mut out = ParsedPayload::default();
        for doc in &payload.documents {
            self.parse_document(doc, &mut out);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::parse_source;

    fn payload(value: serde_json::Value) -> SourcePayload {
        SourcePayload::from_value(Source::Literature, value).unwrap()
    }

    fn annotation(identifier: &str, kind: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "text": text,
            "infons": { "identifier": identifier, "type": kind }
        })
    }

    #[test]
    fn extracts_entities_from_title_and_abstract_only() {
        let parsed = parse_source(&payload(serde_json::json!({
            "documents": [{
                "id": "35477782",
                "passages": [
                    {
                        "infons": { "type": "title" },
                        "annotations": [annotation("MESH:D003866", "Disease", "depression")]
                    },
                    {
                        "infons": { "type": "abstract" },
                        "annotations": [annotation("NCBIGene:2099", "Gene", "ESR1")]
                    },
                    {
                        "infons": { "type": "paragraph" },
                        "annotations": [annotation("MESH:D012345", "Disease", "noise")]
                    }
                ]
            }]
        })))
        .unwrap();

        let ids: Vec<&str> = parsed.entities.iter().map(|e| e.source_id.as_str()).collect();
        assert_eq!(ids, vec!["MESH:D003866", "NCBIGene:2099"]);
        assert_eq!(parsed.relations.len(), 0);
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn annotation_missing_identifier_is_dropped_and_counted() {
        let parsed = parse_source(&payload(serde_json::json!({
            "documents": [{
                "id": "1",
                "passages": [{
                    "infons": { "type": "title" },
                    "annotations": [
                        annotation("MESH:D003866", "Disease", "depression"),
                        { "text": "orphan", "infons": { "type": "Gene" } },
                        { "text": "untyped", "infons": { "identifier": "MESH:D1" } }
                    ]
                }]
            }]
        })))
        .unwrap();

        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.dropped, 2);
    }

    #[test]
    fn relations_carry_document_publication_and_mapped_predicate() {
        let parsed = parse_source(&payload(serde_json::json!({
            "documents": [{
                "id": "35477782",
                "passages": [],
                "relations": [{
                    "infons": {
                        "type": "associate",
                        "role1": "Disease|MESH:D003866",
                        "role2": "Gene|NCBIGene:2099"
                    }
                }]
            }]
        })))
        .unwrap();

        assert_eq!(parsed.relations.len(), 1);
        let relation = &parsed.relations[0];
        assert_eq!(relation.subject_id, "MESH:D003866");
        assert_eq!(relation.object_id, "NCBIGene:2099");
        assert_eq!(relation.predicate, "associated with");
        assert_eq!(relation.publications, vec!["PMID:35477782".to_string()]);
        assert_eq!(relation.primary_source(), Some(LITERATURE_RESOURCE));
    }

    #[test]
    fn malformed_role_string_drops_relation() {
        let parsed = parse_source(&payload(serde_json::json!({
            "documents": [{
                "id": "1",
                "relations": [{
                    "infons": { "type": "associate", "role1": "no-separator", "role2": "Gene|X" }
                }]
            }]
        })))
        .unwrap();

        assert!(parsed.relations.is_empty());
        assert_eq!(parsed.dropped, 1);
    }
}
