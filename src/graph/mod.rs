//! Core graph types: canonical nodes, edges, identity, per-call context

mod context;
mod edge;
mod identity;
mod node;

pub use context::{IngestContext, IngestCounters};
pub use edge::{CanonicalEdge, EvidenceBundle};
pub use identity::resolve_display_type;
pub use node::{AttributeValue, Attributes, CanonicalNode, Source};
