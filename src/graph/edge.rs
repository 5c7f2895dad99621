//! Canonical edge representation with deterministic composite identity

use super::node::Source;
use crate::adapter::Qualifier;
use serde::{Deserialize, Serialize};

/// Separator used when joining composite id segments.
const ID_SEPARATOR: &str = "|";

/// Provenance and justification bundle carried on every canonical edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceBundle {
    /// The resource that originally asserted the relationship
    /// (e.g. "infores:semmeddb")
    pub primary_source: String,
    /// Aggregators the assertion passed through, outermost last
    pub aggregator_chain: Vec<String>,
    /// Supporting publications, deduplicated and sorted
    /// (e.g. "PMID:35477782")
    pub publications: Vec<String>,
    /// Structured qualifiers refining the predicate
    pub qualifiers: Vec<Qualifier>,
    /// Human-readable rendering of predicate + qualifiers
    pub phrase: String,
}

/// A canonical directed edge in the merged graph.
///
/// Identity is the composite id; two ingestion calls that observe the
/// same real-world assertion converge on the same id without a prior
/// lookup. Publication sets for a colliding id are unioned via explicit
/// read-merge-write, never blind overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEdge {
    /// Deterministic composite identifier
    pub id: String,
    /// Subject node id
    pub subject: String,
    /// Object node id
    pub object: String,
    /// Display label (cleaned predicate, e.g. "affects")
    pub label: String,
    /// Evidence bundle
    pub evidence: EvidenceBundle,
    /// Which connector produced this edge
    pub origin: Source,
}

impl CanonicalEdge {
    /// Compute the deterministic composite edge id.
    ///
    /// Pure function of the provenance five-tuple plus graph scope:
    /// recomputing it from the same inputs always yields the same string,
    /// so independent ingestion calls converge on the same identity.
    pub fn composite_id(
        graph_scope: &str,
        data_source: Source,
        primary_source: &str,
        subject: &str,
        label: &str,
        object: &str,
    ) -> String {
        [
            graph_scope,
            data_source.tag(),
            primary_source,
            subject,
            label,
            object,
        ]
        .join(ID_SEPARATOR)
    }

    pub fn new(
        graph_scope: &str,
        data_source: Source,
        subject: impl Into<String>,
        object: impl Into<String>,
        label: impl Into<String>,
        evidence: EvidenceBundle,
    ) -> Self {
        let subject = subject.into();
        let object = object.into();
        let label = label.into();
        let id = Self::composite_id(
            graph_scope,
            data_source,
            &evidence.primary_source,
            &subject,
            &label,
            &object,
        );
        Self {
            id,
            subject,
            object,
            label,
            evidence,
            origin: data_source,
        }
    }

    /// Union another publication set into this edge's evidence.
    ///
    /// Returns true if the set grew. The result is deduplicated and
    /// sorted so repeated merges compare stably.
    pub fn merge_publications(&mut self, incoming: &[String]) -> bool {
        let before = self.evidence.publications.len();
        self.evidence
            .publications
            .extend(incoming.iter().cloned());
        self.evidence.publications.sort();
        self.evidence.publications.dedup();
        self.evidence.publications.len() != before
    }
}
