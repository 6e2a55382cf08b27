//! Service layer modules for external integrations.
//!
//! Contains the blob stores backing the order and recipient collections.

pub mod records;
pub mod store;

pub use records::RecordStore;
pub use store::{BlobStore, MemoryStore, RedisStore};
