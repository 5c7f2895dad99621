//! Ingestion pipeline
//!
//! One `ingest()` call takes a tagged payload from normalization to
//! persistence: adapter parse, canonical node resolution, edge
//! identity and phrase rendering, optional multi-seed filtering,
//! read-merge-write deduplication against the store, and batched
//! commit. All entities resolve before any edge does, so an edge
//! always finds both endpoints locally.
//!
//! There is no cancellation once a call starts. A call that outlasts
//! its soft deadline finishes on a spawned task and reports its final
//! counts through the configured notifier instead of the original
//! return value.

use crate::adapter::{
    clean_term, parse_source, render_phrase, AdapterError, SourcePayload,
};
use crate::annotate::{AnnotationSession, JobPoller, PollError};
use crate::graph::{
    resolve_display_type, CanonicalEdge, CanonicalNode, EvidenceBundle, IngestContext,
    IngestCounters, Source,
};
use crate::query::filter_bridging;
use crate::storage::{BatchUpserter, GraphStore, StorageError, UpsertSummary};
use crate::util::RateLimiter;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Primary source recorded when an edge arrives without provenance.
const UNSPECIFIED_SOURCE: &str = "unspecified";

/// Bounded retries for the merge-read against the store.
const READ_RETRIES: usize = 3;

/// Pause between merge-read retries.
const READ_RETRY_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{detail} — {hint}")]
    Validation { detail: String, hint: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("store unavailable after {READ_RETRIES} attempts: {0}")]
    StoreUnavailable(StorageError),

    #[error(transparent)]
    Poll(#[from] PollError),
}

/// Options for one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Graph scope all identities are computed under
    pub graph_scope: String,
    /// Records per store batch
    pub batch_size: usize,
    /// Seed node ids; with two or more, the neighborhood filter runs
    pub seeds: Vec<String>,
    /// Soft deadline: work past it continues in the background
    pub deadline: Option<Duration>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            graph_scope: "main".to_string(),
            batch_size: 100,
            seeds: Vec::new(),
            deadline: None,
        }
    }
}

/// Final counts of one ingestion call.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    pub nodes: UpsertSummary,
    pub edges: UpsertSummary,
    /// Stored edges whose publication sets grew and were rewritten
    pub updated_edges: usize,
    pub counters: IngestCounters,
}

/// What the caller gets back from `ingest()`.
#[derive(Debug)]
pub enum IngestOutcome {
    /// The call finished within its deadline
    Completed(IngestSummary),
    /// The deadline passed; commit continues in the background and the
    /// summary arrives through the notifier
    Background { call_id: Uuid },
}

/// Out-of-band completion notice.
#[derive(Debug, Clone)]
pub struct IngestNotice {
    pub call_id: Uuid,
    pub finished_at: DateTime<Utc>,
    pub summary: IngestSummary,
}

/// Side channel for completion notices.
pub trait IngestNotifier: Send + Sync {
    fn notify(&self, notice: IngestNotice);
}

/// Notifier backed by an unbounded channel.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<IngestNotice>,
}

impl ChannelNotifier {
    pub fn pair() -> (Arc<Self>, mpsc::UnboundedReceiver<IngestNotice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

impl IngestNotifier for ChannelNotifier {
    fn notify(&self, notice: IngestNotice) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.sender.send(notice);
    }
}

/// The ingestion pipeline. Holds the store and the optional notifier;
/// all per-call state lives in the call's own `IngestContext`.
pub struct IngestPipeline {
    store: Arc<dyn GraphStore>,
    notifier: Option<Arc<dyn IngestNotifier>>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn IngestNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Ingest one tagged payload.
    pub async fn ingest(
        &self,
        payload: SourcePayload,
        options: IngestOptions,
    ) -> Result<IngestOutcome, IngestError> {
        let started = Instant::now();
        validate_options(&options)?;

        let source = payload.source();
        let parsed = parse_source(&payload)?;
        if parsed.is_empty() {
            return Err(AdapterError::Empty.into());
        }
        info!(
            source = %source,
            entities = parsed.entities.len(),
            relations = parsed.relations.len(),
            dropped = parsed.dropped,
            "payload parsed"
        );

        let mut ctx = IngestContext::new(options.graph_scope.clone(), source);
        ctx.counters.dropped_records = parsed.dropped;
        ctx.counters.cooccurrence_filtered = parsed.filtered;

        // Entities first: every edge must find both endpoints locally.
        for entity in &parsed.entities {
            let display_type = resolve_display_type(&entity.categories);
            let mut node = CanonicalNode::new(
                entity.source_id.as_str(),
                entity.name.as_str(),
                display_type,
                source,
            );
            node.attributes = entity.attributes.clone();
            ctx.add_node(node);
        }

        for relation in &parsed.relations {
            let endpoints = (
                ctx.nodes.get(&relation.subject_id).map(|n| n.label.clone()),
                ctx.nodes.get(&relation.object_id).map(|n| n.label.clone()),
            );
            let (Some(subject_label), Some(object_label)) = endpoints else {
                ctx.counters.dropped_records += 1;
                debug!(
                    subject = %relation.subject_id,
                    object = %relation.object_id,
                    "relation endpoint not materialized, dropped"
                );
                continue;
            };

            let phrase = render_phrase(
                &subject_label,
                &relation.predicate,
                &object_label,
                &relation.qualifiers,
            );
            let evidence = EvidenceBundle {
                primary_source: relation
                    .primary_source()
                    .unwrap_or(UNSPECIFIED_SOURCE)
                    .to_string(),
                aggregator_chain: relation.aggregator_chain(),
                publications: relation.publications.clone(),
                qualifiers: relation.qualifiers.clone(),
                phrase,
            };
            let edge = CanonicalEdge::new(
                &ctx.graph_scope,
                source,
                relation.subject_id.as_str(),
                relation.object_id.as_str(),
                clean_term(&relation.predicate),
                evidence,
            );
            ctx.add_edge(edge);
        }

        if options.seeds.len() >= 2 {
            apply_neighborhood_filter(&mut ctx, &options.seeds);
        }

        // Merge-before-insert: edges already stored only grow their
        // publication sets via explicit read-merge-write.
        let existing = self.read_existing_edges(&ctx.graph_scope, source).await?;
        let mut inserts: Vec<CanonicalEdge> = Vec::new();
        for (id, edge) in std::mem::take(&mut ctx.edges) {
            match existing.get(&id) {
                Some(stored) => {
                    let mut merged = stored.clone();
                    if merged.merge_publications(&edge.evidence.publications) {
                        ctx.edge_updates.push(merged);
                    }
                    ctx.counters.merged_edges += 1;
                }
                None => inserts.push(edge),
            }
        }

        let mut nodes: Vec<CanonicalNode> = std::mem::take(&mut ctx.nodes).into_values().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        inserts.sort_by(|a, b| a.id.cmp(&b.id));

        let commit = CommitJob {
            store: Arc::clone(&self.store),
            notifier: self.notifier.clone(),
            call_id: ctx.call_id,
            batch_size: options.batch_size,
            nodes,
            edges: inserts,
            updates: std::mem::take(&mut ctx.edge_updates),
            counters: ctx.counters,
        };

        let deadline_passed = options
            .deadline
            .map(|d| started.elapsed() >= d)
            .unwrap_or(false);
        if deadline_passed {
            let call_id = commit.call_id;
            warn!(%call_id, "deadline passed before commit, continuing in background");
            tokio::spawn(commit.run());
            return Ok(IngestOutcome::Background { call_id });
        }

        let summary = commit.run().await;
        Ok(IngestOutcome::Completed(summary))
    }

    /// Poll the annotation service for free text, then ingest the
    /// resulting document payload.
    pub async fn ingest_text(
        &self,
        poller: &JobPoller,
        session: &dyn AnnotationSession,
        text: &str,
        concept_filter: Option<&str>,
        options: IngestOptions,
    ) -> Result<IngestOutcome, IngestError> {
        if text.trim().is_empty() {
            return Err(IngestError::Validation {
                detail: "no text to annotate".into(),
                hint: "provide a non-empty abstract or paragraph".into(),
            });
        }
        let value = poller.run(session, text, concept_filter).await?;
        let payload = SourcePayload::from_value(Source::Literature, value)?;
        self.ingest(payload, options).await
    }

    async fn read_existing_edges(
        &self,
        scope: &str,
        source: Source,
    ) -> Result<std::collections::HashMap<String, CanonicalEdge>, IngestError> {
        let limiter = RateLimiter::new(READ_RETRY_INTERVAL);
        let mut last_err = None;
        for attempt in 1..=READ_RETRIES {
            limiter.wait().await;
            match self.store.get_existing_edges(scope, source).await {
                Ok(map) => return Ok(map),
                Err(err) => {
                    warn!(attempt, error = %err, "merge-read failed");
                    last_err = Some(err);
                }
            }
        }
        Err(IngestError::StoreUnavailable(last_err.expect("at least one attempt")))
    }
}

fn validate_options(options: &IngestOptions) -> Result<(), IngestError> {
    if options.graph_scope.trim().is_empty() {
        return Err(IngestError::Validation {
            detail: "graph scope is empty".into(),
            hint: "pass a scope name such as \"main\"".into(),
        });
    }
    if options.graph_scope.contains('|') {
        return Err(IngestError::Validation {
            detail: format!("graph scope {:?} contains '|'", options.graph_scope),
            hint: "the separator is reserved for composite ids".into(),
        });
    }
    Ok(())
}

fn apply_neighborhood_filter(ctx: &mut IngestContext, seeds: &[String]) {
    let seed_set: HashSet<String> = seeds.iter().cloned().collect();
    let edges: Vec<CanonicalEdge> = std::mem::take(&mut ctx.edges).into_values().collect();
    let result = filter_bridging(&seed_set, edges);

    let before = ctx.nodes.len();
    ctx.nodes.retain(|id, _| {
        seed_set.contains(id) || result.retained_neighbors.contains(id)
    });
    ctx.counters.neighbors_filtered = before - ctx.nodes.len();

    for edge in result.edges {
        ctx.edges.insert(edge.id.clone(), edge);
    }
}

/// The commit phase, detachable so a deadline overrun can finish on a
/// spawned task.
struct CommitJob {
    store: Arc<dyn GraphStore>,
    notifier: Option<Arc<dyn IngestNotifier>>,
    call_id: Uuid,
    batch_size: usize,
    nodes: Vec<CanonicalNode>,
    edges: Vec<CanonicalEdge>,
    updates: Vec<CanonicalEdge>,
    counters: IngestCounters,
}

impl CommitJob {
    async fn run(mut self) -> IngestSummary {
        let upserter = BatchUpserter::new(self.store.as_ref(), self.batch_size);
        let node_summary = upserter.upsert_nodes(&self.nodes).await;
        let edge_summary = upserter.upsert_edges(&self.edges).await;

        let mut updated_edges = 0;
        for edge in &self.updates {
            match self.store.update_edge(edge).await {
                Ok(()) => updated_edges += 1,
                Err(err) => {
                    // A lost merge is recoverable: publication sets are
                    // monotonic and a later re-ingestion converges.
                    self.counters.merge_conflicts += 1;
                    warn!(edge_id = %edge.id, error = %err, "publication merge failed, skipped");
                }
            }
        }

        let summary = IngestSummary {
            nodes: node_summary,
            edges: edge_summary,
            updated_edges,
            counters: self.counters,
        };
        info!(
            call_id = %self.call_id,
            nodes_created = summary.nodes.created,
            edges_created = summary.edges.created,
            updated_edges,
            "ingestion committed"
        );

        if let Some(notifier) = &self.notifier {
            notifier.notify(IngestNotice {
                call_id: self.call_id,
                finished_at: Utc::now(),
                summary,
            });
        }
        summary
    }
}
