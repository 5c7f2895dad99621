//! Source adapters: heterogeneous payloads to `{entities, relations}`
//!
//! One adapter per external payload shape, all behind the
//! `SourceAdapter` trait. Dispatch goes through the tagged
//! `SourcePayload` union; nothing downstream ever probes raw JSON.

mod bindings;
mod document;
mod expand;
mod knowledge_graph;
pub mod message;
mod qualifier;
mod traits;
mod types;

pub use bindings::BindingsAdapter;
pub use document::{DocumentAdapter, DocumentPayload};
pub use expand::{expand_edge, Expansion};
pub use message::GraphPayload;
pub use qualifier::{clean_term, render_phrase};
pub use traits::{parse_source, AdapterError, SourceAdapter, SourcePayload};
pub use types::{
    EvidenceRef, EvidenceRole, ParsedPayload, Qualifier, RawEntity, RawRelation,
};
