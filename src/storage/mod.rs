//! Store interface, implementations, and the batch upsert client

mod batch;
mod http;
mod memory;
mod traits;

pub use batch::{BatchUpserter, UpsertSummary};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use traits::{BulkOutcome, GraphStore, StorageError, StorageResult};
