//! The four todo operations.
//!
//! Each function validates its input first and then makes at most one
//! repository call. Malformed input never reaches storage. Identifiers arrive
//! already parsed; callers decode them with `TodoId::parse` at the boundary.

use tracing::{debug, info};

use crate::error::TodoError;
use crate::id::TodoId;
use crate::repository::TodoRepository;
use crate::types::{CreateTodo, TodoItem, UpdateTodo};

/// Every stored item. An empty collection is an empty vector.
pub async fn list_todos(repo: &dyn TodoRepository) -> Result<Vec<TodoItem>, TodoError> {
    let items = repo.list().await?;
    debug!(count = items.len(), "listed todos");
    Ok(items)
}

/// Validate, stamp with a new id and creation time, and persist.
pub async fn create_todo(
    repo: &dyn TodoRepository,
    input: CreateTodo,
) -> Result<TodoItem, TodoError> {
    let title = input.validate()?;
    let item = TodoItem::new(title);
    repo.insert(&item).await?;
    info!(id = %item.id, "created todo");
    Ok(item)
}

/// Replace title and completion of the item `id`.
///
/// Succeeds whether or not the item exists.
pub async fn update_todo(
    repo: &dyn TodoRepository,
    id: &TodoId,
    input: UpdateTodo,
) -> Result<(), TodoError> {
    let changes = input.validate()?;
    if repo.update(id, &changes).await? {
        info!(%id, completed = changes.completed, "updated todo");
    } else {
        debug!(%id, "update matched no todo");
    }
    Ok(())
}

/// Remove the item `id`. Succeeds whether or not it exists.
pub async fn delete_todo(repo: &dyn TodoRepository, id: &TodoId) -> Result<(), TodoError> {
    if repo.delete(id).await? {
        info!(%id, "deleted todo");
    } else {
        debug!(%id, "delete matched no todo");
    }
    Ok(())
}
