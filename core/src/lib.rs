//! Domain core for the todo service.
//!
//! # Overview
//! Holds everything about todo items that does not depend on HTTP or on a
//! particular database: the identifier and item types, input validation, the
//! two error kinds, the `TodoRepository` storage trait with an in-memory
//! implementation, and the operations the HTTP layer calls.
//!
//! # Design
//! - Operations in `service` take `&dyn TodoRepository`; the caller decides
//!   which storage backs them.
//! - `TodoId` is validated once when it enters the system and is opaque
//!   afterwards.
//! - `Title` cannot be empty, so neither can a persisted title.

pub mod error;
pub mod id;
pub mod memory;
pub mod repository;
pub mod service;
pub mod types;

pub use error::{StorageError, StorageOp, TodoError, ValidationError};
pub use id::TodoId;
pub use memory::InMemoryRepository;
pub use repository::{StorageResult, TodoRepository};
pub use types::{CreateTodo, Title, TodoChanges, TodoItem, UpdateTodo};
