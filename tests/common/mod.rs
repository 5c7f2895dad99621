//! Shared payload builders for integration tests

use medkg::{Source, SourcePayload};

/// Shape (a): one document with title annotations and optional
/// document-level relations.
pub fn literature_payload(
    pmid: &str,
    annotations: &[(&str, &str, &str)],
    relations: &[(&str, &str, &str)],
) -> SourcePayload {
    let annotations: Vec<serde_json::Value> = annotations
        .iter()
        .map(|(identifier, kind, text)| {
            serde_json::json!({
                "text": text,
                "infons": { "identifier": identifier, "type": kind }
            })
        })
        .collect();
    let relations: Vec<serde_json::Value> = relations
        .iter()
        .map(|(predicate, role1, role2)| {
            serde_json::json!({
                "infons": { "type": predicate, "role1": role1, "role2": role2 }
            })
        })
        .collect();

    SourcePayload::from_value(
        Source::Literature,
        serde_json::json!({
            "documents": [{
                "id": pmid,
                "passages": [{ "infons": { "type": "title" }, "annotations": annotations }],
                "relations": relations,
            }]
        }),
    )
    .expect("literature payload should deserialize")
}

/// A knowledge-graph node entry.
pub fn kg_node(name: &str, category: &str) -> serde_json::Value {
    serde_json::json!({ "name": name, "categories": [category] })
}

/// A knowledge-graph edge entry with publications.
pub fn kg_edge(subject: &str, object: &str, predicate: &str, pubs: &[&str]) -> serde_json::Value {
    let mut edge = serde_json::json!({
        "subject": subject,
        "object": object,
        "predicate": predicate,
        "sources": [
            { "resource_id": "infores:semmeddb", "resource_role": "primary_knowledge_source" }
        ],
    });
    if !pubs.is_empty() {
        edge["attributes"] = serde_json::json!([
            { "attribute_type_id": "biolink:publications", "value": pubs }
        ]);
    }
    edge
}

/// Shape (b): message with node and edge dictionaries.
pub fn knowledge_graph_payload(
    nodes: serde_json::Value,
    edges: serde_json::Value,
) -> SourcePayload {
    SourcePayload::from_value(
        Source::KnowledgeGraph,
        serde_json::json!({
            "message": { "knowledge_graph": { "nodes": nodes, "edges": edges } }
        }),
    )
    .expect("knowledge-graph payload should deserialize")
}
