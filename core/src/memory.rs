//! In-memory repository for tests and local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::id::TodoId;
use crate::repository::{StorageResult, TodoRepository};
use crate::types::{TodoChanges, TodoItem};

/// Keeps items in insertion order behind a `tokio` read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    items: RwLock<Vec<TodoItem>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Look up a single item.
    pub async fn get(&self, id: &TodoId) -> Option<TodoItem> {
        self.items.read().await.iter().find(|t| &t.id == id).cloned()
    }
}

#[async_trait]
impl TodoRepository for InMemoryRepository {
    async fn list(&self) -> StorageResult<Vec<TodoItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn insert(&self, item: &TodoItem) -> StorageResult<()> {
        self.items.write().await.push(item.clone());
        Ok(())
    }

    async fn update(&self, id: &TodoId, changes: &TodoChanges) -> StorageResult<bool> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|t| &t.id == id) {
            Some(item) => {
                item.apply(changes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &TodoId) -> StorageResult<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|t| &t.id != id);
        Ok(items.len() != before)
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
