//! Durable key-value storage backing the roster.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Whole-value storage keyed by string. `set` overwrites.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
