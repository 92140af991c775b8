//! In-memory repository for exercising callers without touching disk.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::repository::TodoRepository;
use crate::types::{Task, Todo};

/// Repository double backed by a plain vector, honoring the same contract
/// as the store-backed implementation.
///
/// All state is owned by the instance; [`clear`](Self::clear) empties it so
/// one shared instance can be reused across test cases.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    list: Vec<Todo>,
    keys: HashSet<Uuid>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored todo.
    pub fn clear(&self) {
        let mut inner = self.locked();
        inner.list.clear();
        inner.keys.clear();
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn add_todo(&self, todo: Todo) -> Result<(), RepositoryError> {
        let mut inner = self.locked();
        if !inner.keys.insert(todo.id) {
            return Err(RepositoryError::DuplicateTodo(todo.id));
        }
        inner.list.push(todo);
        Ok(())
    }

    fn add_task(&self, todo_id: Uuid, task: Task) -> Result<(), RepositoryError> {
        let mut inner = self.locked();
        let todo = inner
            .list
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or(RepositoryError::NotFound(todo_id))?;
        if todo.tasks.iter().any(|t| t.id == task.id) {
            return Err(RepositoryError::DuplicateTask(task.id));
        }
        todo.tasks.push(task);
        Ok(())
    }

    fn list_todos(&self) -> Result<Vec<Todo>, RepositoryError> {
        Ok(self.locked().list.clone())
    }

    fn get_todo(&self, todo_id: Uuid) -> Result<Todo, RepositoryError> {
        self.locked()
            .list
            .iter()
            .find(|t| t.id == todo_id)
            .cloned()
            .ok_or(RepositoryError::NotFound(todo_id))
    }

    fn update_todo(
        &self,
        todo_id: Uuid,
        completed: bool,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.locked();
        let todo = inner
            .list
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or(RepositoryError::NotFound(todo_id))?;
        todo.completed = completed;
        todo.due_date = due_date;
        Ok(())
    }

    fn update_task(
        &self,
        todo_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.locked();
        let todo = inner
            .list
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or(RepositoryError::NotFound(todo_id))?;
        // An unknown task id still succeeds, same as the store-backed path.
        if let Some(task) = todo.tasks.iter_mut().find(|t| t.id == task_id) {
            task.completed = completed;
        }
        Ok(())
    }

    fn delete_task(&self, todo_id: Uuid, task_id: Uuid) -> Result<(), RepositoryError> {
        let mut inner = self.locked();
        let todo = inner
            .list
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or(RepositoryError::NotFound(todo_id))?;
        if let Some(pos) = todo.tasks.iter().position(|t| t.id == task_id) {
            todo.tasks.remove(pos);
        }
        Ok(())
    }

    fn delete_todo(&self, todo_id: Uuid) -> Result<(), RepositoryError> {
        let mut inner = self.locked();
        let pos = inner
            .list
            .iter()
            .position(|t| t.id == todo_id)
            .ok_or(RepositoryError::NotFound(todo_id))?;
        inner.list.remove(pos);
        inner.keys.remove(&todo_id);
        Ok(())
    }
}
