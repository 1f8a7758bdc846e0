//! Domain types for todo items.
//!
//! # Design
//! `TodoItem` is both the domain value and the wire shape. Storage backends
//! keep their own document type and map to it explicitly. Request bodies
//! (`CreateTodo`, `UpdateTodo`) are decoded leniently: missing and `null`
//! fields take their defaults, so an absent title is reported as a validation
//! failure rather than a decode failure. `Title` is the only way to get a title into
//! a `TodoItem` or `TodoChanges`, which keeps empty titles out of storage.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::id::TodoId;

/// A non-empty todo title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A single todo item as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// A new, not yet completed item with a fresh identifier.
    ///
    /// The timestamp is truncated to milliseconds, the precision of a BSON
    /// date, so an item reads back exactly as it was created.
    pub fn new(title: Title) -> Self {
        Self {
            id: TodoId::generate(),
            title: title.into_inner(),
            completed: false,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Apply an update. Only title and completion can change.
    pub fn apply(&mut self, changes: &TodoChanges) {
        self.title = changes.title.as_str().to_string();
        self.completed = changes.completed;
    }
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

impl CreateTodo {
    pub fn validate(self) -> Result<Title, ValidationError> {
        Title::new(self.title)
    }
}

/// Request payload for replacing a todo's title and completion flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

impl UpdateTodo {
    pub fn validate(self) -> Result<TodoChanges, ValidationError> {
        Ok(TodoChanges {
            title: Title::new(self.title)?,
            completed: self.completed,
        })
    }
}

/// `null` decodes like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The validated set of fields an update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Title,
    pub completed: bool,
}
