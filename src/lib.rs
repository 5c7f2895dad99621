//! Medkg: biomedical knowledge-graph ingestion engine
//!
//! Normalizes relationship payloads from three independently-shaped
//! external knowledge sources into one canonical, persistently-mergeable
//! graph.
//!
//! # Core Concepts
//!
//! - **Source adapters**: one per external payload shape, lowering raw
//!   trees into `{entities, relations}`
//! - **Composite edge identity**: deterministic ids let independent
//!   ingestion calls converge on the same edge without a prior lookup
//! - **Per-call context**: each ingestion owns its caches; nothing
//!   persists between calls
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use medkg::{IngestPipeline, MemoryStore};
//!
//! let pipeline = IngestPipeline::new(Arc::new(MemoryStore::new()));
//! // Pipeline is ready for ingestion calls
//! ```

pub mod adapter;
pub mod annotate;
mod graph;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod util;

pub use adapter::{parse_source, AdapterError, ParsedPayload, Qualifier, SourcePayload};
pub use annotate::{AnnotationSession, JobPoller, PollError, PollState, RetrieveResponse};
pub use graph::{
    resolve_display_type, AttributeValue, CanonicalEdge, CanonicalNode, EvidenceBundle,
    IngestContext, IngestCounters, Source,
};
pub use pipeline::{
    ChannelNotifier, IngestError, IngestNotice, IngestNotifier, IngestOptions, IngestOutcome,
    IngestPipeline, IngestSummary,
};
pub use query::{filter_bridging, NeighborhoodResult};
pub use storage::{
    BatchUpserter, BulkOutcome, GraphStore, HttpStore, MemoryStore, StorageError, StorageResult,
    UpsertSummary,
};
pub use util::RateLimiter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
