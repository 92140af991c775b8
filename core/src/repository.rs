//! Aggregate-root persistence for todos.
//!
//! # Consistency
//! The repository layers duplicate checking and task mutation on top of a
//! plain key-value store, so its compound operations are not atomic:
//!
//! - `add_todo` scans existing keys and then writes in two separate store
//!   calls. Two concurrent writers with the same id can both pass the scan;
//!   the store has no conditional write to close that window.
//! - Task and scalar mutations read the whole record, modify it in memory
//!   and write it back. Concurrent writers to the same todo resolve as
//!   last-writer-wins.
//!
//! Both limitations are inherent to the store contract and are accepted;
//! callers needing stronger guarantees must serialize access themselves.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::codec;
use crate::error::{RepositoryError, StoreError};
use crate::store::{DiskStore, KeyValueStore};
use crate::types::{Task, Todo};

/// Persistence contract for todo aggregates.
///
/// Every record is one whole aggregate; tasks are never stored on their own.
pub trait TodoRepository: Send + Sync {
    /// Store a new aggregate. Fails with [`RepositoryError::DuplicateTodo`]
    /// when the id is already taken, leaving the store unchanged.
    fn add_todo(&self, todo: Todo) -> Result<(), RepositoryError>;

    /// Append `task` to the end of the parent's task list. Fails with
    /// `NotFound` when the parent is absent and `DuplicateTask` when the
    /// parent already holds a task with the same id.
    fn add_task(&self, todo_id: Uuid, task: Task) -> Result<(), RepositoryError>;

    /// Every stored aggregate, in store enumeration order (unspecified).
    /// The first record that fails to decode aborts the whole listing.
    fn list_todos(&self) -> Result<Vec<Todo>, RepositoryError>;

    /// The aggregate stored under `todo_id`.
    fn get_todo(&self, todo_id: Uuid) -> Result<Todo, RepositoryError>;

    /// Overwrite `completed` and `due_date`, leaving `name`, `description`
    /// and `tasks` untouched.
    fn update_todo(
        &self,
        todo_id: Uuid,
        completed: bool,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError>;

    /// Set the completion flag of one task. An unknown `task_id` is a
    /// silent success: the record is rewritten unchanged.
    fn update_task(
        &self,
        todo_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<(), RepositoryError>;

    /// Remove the first task matching `task_id`, preserving the relative
    /// order of the rest. An unknown `task_id` is a silent success.
    fn delete_task(&self, todo_id: Uuid, task_id: Uuid) -> Result<(), RepositoryError>;

    /// Remove the whole aggregate. Fails with `NotFound` when absent.
    fn delete_todo(&self, todo_id: Uuid) -> Result<(), RepositoryError>;
}

/// Repository over any byte-oriented key-value store.
///
/// Each todo is one record keyed by its string-encoded id in the store's
/// flat namespace.
#[derive(Debug)]
pub struct KvTodoRepository<S> {
    store: S,
}

impl KvTodoRepository<DiskStore> {
    /// Open a disk-backed repository rooted at `path`.
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        Ok(Self::new(DiskStore::open(path)?))
    }
}

impl<S: KeyValueStore> KvTodoRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_record(&self, todo_id: Uuid) -> Result<Todo, RepositoryError> {
        let key = todo_id.to_string();
        let bytes = match self.store.get(&key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) => return Err(RepositoryError::NotFound(todo_id)),
            Err(e) => return Err(e.into()),
        };
        codec::decode(&bytes).map_err(|source| RepositoryError::CorruptRecord { key, source })
    }

    fn write_record(&self, todo: &Todo) -> Result<(), RepositoryError> {
        let key = todo.id.to_string();
        let blob = codec::encode(todo).map_err(|source| RepositoryError::CorruptRecord {
            key: key.clone(),
            source,
        })?;
        self.store.put(&key, &blob)?;
        Ok(())
    }
}

impl<S: KeyValueStore + Send + Sync> TodoRepository for KvTodoRepository<S> {
    fn add_todo(&self, todo: Todo) -> Result<(), RepositoryError> {
        let key = todo.id.to_string();
        if self.store.keys().any(|existing| existing == key) {
            return Err(RepositoryError::DuplicateTodo(todo.id));
        }
        self.write_record(&todo)
    }

    fn add_task(&self, todo_id: Uuid, task: Task) -> Result<(), RepositoryError> {
        let mut todo = self.read_record(todo_id)?;
        if todo.tasks.iter().any(|t| t.id == task.id) {
            return Err(RepositoryError::DuplicateTask(task.id));
        }
        todo.tasks.push(task);
        self.write_record(&todo)
    }

    fn list_todos(&self) -> Result<Vec<Todo>, RepositoryError> {
        let mut todos = Vec::new();
        for key in self.store.keys() {
            let bytes = self.store.get(&key)?;
            let todo = codec::decode(&bytes)
                .map_err(|source| RepositoryError::CorruptRecord { key, source })?;
            todos.push(todo);
        }
        Ok(todos)
    }

    fn get_todo(&self, todo_id: Uuid) -> Result<Todo, RepositoryError> {
        self.read_record(todo_id)
    }

    fn update_todo(
        &self,
        todo_id: Uuid,
        completed: bool,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut todo = self.read_record(todo_id)?;
        todo.completed = completed;
        todo.due_date = due_date;
        self.write_record(&todo)
    }

    fn update_task(
        &self,
        todo_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<(), RepositoryError> {
        let mut todo = self.read_record(todo_id)?;
        if let Some(task) = todo.tasks.iter_mut().find(|t| t.id == task_id) {
            task.completed = completed;
        }
        self.write_record(&todo)
    }

    fn delete_task(&self, todo_id: Uuid, task_id: Uuid) -> Result<(), RepositoryError> {
        let mut todo = self.read_record(todo_id)?;
        if let Some(pos) = todo.tasks.iter().position(|t| t.id == task_id) {
            todo.tasks.remove(pos);
        }
        self.write_record(&todo)
    }

    fn delete_todo(&self, todo_id: Uuid) -> Result<(), RepositoryError> {
        match self.store.delete(&todo_id.to_string()) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(RepositoryError::NotFound(todo_id)),
            Err(e) => Err(e.into()),
        }
    }
}
