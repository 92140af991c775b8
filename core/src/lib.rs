//! Persistence core for the todo service.
//!
//! # Overview
//! A todo and its tasks form one aggregate, stored as a single opaque record
//! in a flat string-keyed byte store. This crate owns everything below the
//! HTTP boundary: the domain types, the record codec, the key-value store
//! seam, and the repository that enforces the domain rules (duplicate ids,
//! partial updates, whole-record rewrites).
//!
//! # Design
//! - [`KeyValueStore`] is the storage seam; [`DiskStore`] is the shipped
//!   backend (one file per key).
//! - [`KvTodoRepository`] works against any store through that seam.
//! - [`InMemoryTodoRepository`] honors the same contract with no I/O, for
//!   exercising callers in tests.
//! - Compound operations are not atomic; see the [`repository`] module docs
//!   for the exact consistency caveats.

pub mod codec;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;
pub mod types;

pub use error::{CodecError, RepositoryError, StoreError};
pub use memory::InMemoryTodoRepository;
pub use repository::{KvTodoRepository, TodoRepository};
pub use store::{DiskStore, KeyValueStore};
pub use types::{Task, TaskCompletion, Todo, UpdateTodo};
