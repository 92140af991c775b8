//! HTTP surface for the todo service.
//!
//! # Design
//! Handlers are thin translation: they turn a request into a repository
//! call and map the typed error onto a status code. The repository is
//! injected as `Arc<dyn TodoRepository>`, so tests run the router against
//! the in-memory implementation and the binary wires up the disk-backed one.
//!
//! Identifiers are parsed by hand and bodies are decoded from the raw text
//! so every malformed input is a 400, whatever axum's default rejection
//! would be. Records posted without an id get one assigned here, at the
//! boundary; the repository always sees fully-formed aggregates.
//!
//! The status codes are a fixed wire contract: 201 for task completion, 202
//! for a single-todo read, 404 for listing an empty store. Existing clients
//! depend on them.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use todo_core::{RepositoryError, Task, TaskCompletion, Todo, TodoRepository, UpdateTodo};
use tokio::net::TcpListener;
use uuid::Uuid;

pub type Repo = Arc<dyn TodoRepository>;

pub fn app(repo: Repo) -> Router {
    Router::new()
        .route("/v1/todo", get(list_todos).post(add_todo))
        .route(
            "/v1/todo/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/v1/todo/{id}/tasks", post(add_task))
        .route("/v1/todo/{id}/task/{task_id}/complete", put(update_task))
        // The delete-task segment glues the literal word onto the task id
        // (`task<uuid>`), so it is matched as one wildcard and split in the
        // handler.
        .route("/v1/todo/{id}/{task_ref}", delete(delete_task))
        .with_state(repo)
}

pub async fn run(listener: TcpListener, repo: Repo) -> Result<(), std::io::Error> {
    axum::serve(listener, app(repo)).await
}

fn internal_error(err: &RepositoryError) -> StatusCode {
    tracing::error!(error = %err, "repository operation failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn add_todo(State(repo): State<Repo>, body: String) -> StatusCode {
    let Ok(mut todo) = serde_json::from_str::<Todo>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    if todo.id.is_nil() {
        todo.id = Uuid::new_v4();
    }
    for task in &mut todo.tasks {
        if task.id.is_nil() {
            task.id = Uuid::new_v4();
        }
    }
    match repo.add_todo(todo) {
        Ok(()) => StatusCode::CREATED,
        Err(RepositoryError::DuplicateTodo(id)) => {
            tracing::debug!(%id, "rejected duplicate todo");
            StatusCode::CONFLICT
        }
        Err(err) => internal_error(&err),
    }
}

async fn add_task(
    State(repo): State<Repo>,
    Path(id): Path<String>,
    body: String,
) -> StatusCode {
    let Ok(todo_id) = Uuid::parse_str(&id) else {
        return StatusCode::BAD_REQUEST;
    };
    let Ok(mut task) = serde_json::from_str::<Task>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    if task.id.is_nil() {
        task.id = Uuid::new_v4();
    }
    match repo.add_task(todo_id, task) {
        Ok(()) => StatusCode::CREATED,
        Err(RepositoryError::DuplicateTask(id)) => {
            tracing::debug!(%id, "rejected duplicate task");
            StatusCode::CONFLICT
        }
        // A missing parent is a 500 on this route, not a 404.
        Err(err) => internal_error(&err),
    }
}

async fn update_task(
    State(repo): State<Repo>,
    Path((id, task_id)): Path<(String, String)>,
    body: String,
) -> StatusCode {
    let Ok(todo_id) = Uuid::parse_str(&id) else {
        return StatusCode::BAD_REQUEST;
    };
    let Ok(task_id) = Uuid::parse_str(&task_id) else {
        return StatusCode::BAD_REQUEST;
    };
    let Ok(completion) = serde_json::from_str::<TaskCompletion>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    match repo.update_task(todo_id, task_id, completion.completed) {
        Ok(()) => StatusCode::CREATED,
        Err(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(err) => internal_error(&err),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    search: Option<String>,
    skip: Option<String>,
    limit: Option<String>,
}

/// Parse an optional query value as an integer; absent means 0.
fn parse_count(value: Option<&str>) -> Result<i64, std::num::ParseIntError> {
    value.map_or(Ok(0), str::parse)
}

async fn list_todos(State(repo): State<Repo>, Query(params): Query<ListParams>) -> Response {
    let todos = match repo.list_todos() {
        Ok(todos) => todos,
        Err(err) => return internal_error(&err).into_response(),
    };
    // An empty store is a 404; an empty *filtered* result still replies 200.
    if todos.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Ok(skip) = parse_count(params.skip.as_deref()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Ok(limit) = parse_count(params.limit.as_deref()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut filtered: Vec<Todo> = match params.search.as_deref() {
        Some(search) if !search.is_empty() => {
            let needle = search.to_lowercase();
            todos
                .into_iter()
                .filter(|t| t.name.to_lowercase().contains(&needle))
                .collect()
        }
        _ => todos,
    };

    // Skip and limit only take effect when the list is strictly longer than
    // the requested count; asking to skip past the end returns the whole
    // list untouched. Values of zero or less are ignored.
    if skip > 0 && filtered.len() as i64 > skip {
        filtered.drain(..skip as usize);
    }
    if limit > 0 && filtered.len() as i64 > limit {
        filtered.truncate(limit as usize);
    }

    Json(filtered).into_response()
}

async fn get_todo(State(repo): State<Repo>, Path(id): Path<String>) -> Response {
    let Ok(todo_id) = Uuid::parse_str(&id) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match repo.get_todo(todo_id) {
        Ok(todo) => (StatusCode::ACCEPTED, Json(todo)).into_response(),
        Err(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => internal_error(&err).into_response(),
    }
}

async fn update_todo(
    State(repo): State<Repo>,
    Path(id): Path<String>,
    body: String,
) -> StatusCode {
    let Ok(todo_id) = Uuid::parse_str(&id) else {
        return StatusCode::BAD_REQUEST;
    };
    let Ok(update) = serde_json::from_str::<UpdateTodo>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    match repo.update_todo(todo_id, update.completed, update.due_date) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(err) => internal_error(&err),
    }
}

async fn delete_todo(State(repo): State<Repo>, Path(id): Path<String>) -> StatusCode {
    let Ok(todo_id) = Uuid::parse_str(&id) else {
        return StatusCode::BAD_REQUEST;
    };
    match repo.delete_todo(todo_id) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(err) => internal_error(&err),
    }
}

async fn delete_task(
    State(repo): State<Repo>,
    Path((id, task_ref)): Path<(String, String)>,
) -> StatusCode {
    let Ok(todo_id) = Uuid::parse_str(&id) else {
        return StatusCode::BAD_REQUEST;
    };
    let Some(raw_task_id) = task_ref.strip_prefix("task") else {
        return StatusCode::NOT_FOUND;
    };
    let Ok(task_id) = Uuid::parse_str(raw_task_id) else {
        return StatusCode::BAD_REQUEST;
    };
    match repo.delete_task(todo_id, task_id) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(err) => internal_error(&err),
    }
}
