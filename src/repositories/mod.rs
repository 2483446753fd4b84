//! Key-value persistence backends for the response cache.

pub mod cache_entry_repository;
mod file_store;
mod memory_store;

use crate::errors::FetchError;
use async_trait::async_trait;

pub use cache_entry_repository::MongoStore;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Flat string-to-string storage. Writes overwrite unconditionally.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, FetchError>;

    async fn set(&self, key: &str, value: String) -> Result<(), FetchError>;
}
