//! Error kinds for todo operations.
//!
//! # Design
//! Two kinds only. `ValidationError` means the client sent something we
//! refuse before any storage call is made. `StorageError` means the storage
//! round trip itself failed; it records which operation failed and keeps the
//! driver's error as its source. Neither kind is ever retried.

use std::fmt;

use thiserror::Error;

/// Boxed cause carried by `StorageError`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Client input was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title was missing or the empty string.
    #[error("The title field is required")]
    EmptyTitle,

    /// The identifier is not a 24-digit hex string.
    #[error("Invalid ID format")]
    InvalidId(String),
}

/// The storage operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Connect,
    Ping,
    List,
    Insert,
    Update,
    Delete,
    Decode,
}

impl StorageOp {
    /// Client-facing summary of the failed operation.
    pub fn message(self) -> &'static str {
        match self {
            StorageOp::Connect => "Failed to connect to storage",
            StorageOp::Ping => "Storage is unreachable",
            StorageOp::List => "Failed to fetch todos",
            StorageOp::Insert => "Failed to save todo",
            StorageOp::Update => "Failed to update todo",
            StorageOp::Delete => "Failed to delete todo",
            StorageOp::Decode => "Failed to decode todo",
        }
    }
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOp::Connect => "connect",
            StorageOp::Ping => "ping",
            StorageOp::List => "list",
            StorageOp::Insert => "insert",
            StorageOp::Update => "update",
            StorageOp::Delete => "delete",
            StorageOp::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// A storage round trip failed.
#[derive(Debug, Error)]
#[error("storage {operation} failed: {source}")]
pub struct StorageError {
    pub operation: StorageOp,
    #[source]
    pub source: BoxError,
}

impl StorageError {
    pub fn new(operation: StorageOp, source: impl Into<BoxError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    /// Client-facing summary, e.g. "Failed to save todo".
    pub fn message(&self) -> &'static str {
        self.operation.message()
    }

    /// The underlying cause rendered as text.
    pub fn cause(&self) -> String {
        self.source.to_string()
    }
}

/// Any failure of a todo operation.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
