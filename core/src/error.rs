//! Error taxonomy for the storage and repository layers.
//!
//! # Design
//! `StoreError` covers the raw key-value layer: a key is either missing or
//! the backend failed. `CodecError` covers record (de)serialization.
//! `RepositoryError` is the domain-level taxonomy the HTTP boundary maps
//! onto status codes; callers match on variants, never on message text.

use thiserror::Error;
use uuid::Uuid;

/// Failures from the byte-oriented key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob is stored under the requested key.
    #[error("key `{0}` not found")]
    NotFound(String),

    /// The underlying backend failed to read, write or enumerate.
    #[error("storage i/o failure")]
    Io(#[from] std::io::Error),
}

/// Failures from the record codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The blob is empty, without even a version byte.
    #[error("record is empty")]
    Truncated,

    /// The blob was written by a schema version this build does not read.
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),

    /// The payload does not decode as a todo aggregate.
    #[error("malformed record payload")]
    Malformed(#[from] bincode::Error),
}

/// Failures from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No todo is stored under the given id.
    #[error("todo `{0}` not found")]
    NotFound(Uuid),

    /// A todo with this id already exists; the store was left unchanged.
    #[error("duplicate todo id `{0}`")]
    DuplicateTodo(Uuid),

    /// The parent todo already holds a task with this id.
    #[error("duplicate task id `{0}`")]
    DuplicateTask(Uuid),

    /// The stored blob under `key` failed to (de)code.
    #[error("corrupt record `{key}`")]
    CorruptRecord {
        key: String,
        #[source]
        source: CodecError,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
