//! Storage abstraction for todo items.
//!
//! Handlers hold an `Arc<dyn TodoRepository>` that is built once at startup
//! and passed in through router state. Implementations must be safe to call
//! concurrently; per-document atomicity is left to the storage engine.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::id::TodoId;
use crate::types::{TodoChanges, TodoItem};

/// Result type for repository operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Every stored item, unfiltered.
    async fn list(&self) -> StorageResult<Vec<TodoItem>>;

    /// Persist a new item.
    async fn insert(&self, item: &TodoItem) -> StorageResult<()>;

    /// Overwrite title and completion of the item with `id`.
    ///
    /// Returns whether an item matched.
    async fn update(&self, id: &TodoId, changes: &TodoChanges) -> StorageResult<bool>;

    /// Remove the item with `id`. Returns whether an item was removed.
    async fn delete(&self, id: &TodoId) -> StorageResult<bool>;

    /// One round trip to the storage engine.
    async fn ping(&self) -> StorageResult<()>;

    /// Release the underlying connection. Called once, after the server has
    /// stopped serving requests.
    async fn close(&self) {}
}
