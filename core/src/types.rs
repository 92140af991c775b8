//! Domain model for the todo service.
//!
//! # Design
//! A `Todo` is an aggregate root: its tasks live inside the record and are
//! read and written together with it as one unit. A `Task` has no identity
//! outside its parent. The serde derives serve double duty: they define the
//! camelCase JSON the HTTP surface speaks and they feed the binary storage
//! codec, so optional fields are always encoded (no `skip_serializing_if`).
//!
//! Every request-decodable type carries container-level defaults: a field
//! missing from the JSON simply takes its zero value, and an all-defaults
//! body like `{}` is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo aggregate: scalar fields plus its embedded tasks.
///
/// `tasks` keeps insertion order; listings reflect whatever order tasks were
/// appended in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub tasks: Vec<Task>,
}

/// A single activity inside a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub completed: bool,
}

/// Request payload for rewriting a todo's mutable scalar fields.
///
/// Only `completed` and `due_date` can change after creation; omitting a
/// field clears it to its zero value rather than leaving it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTodo {
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for flipping a task's completion flag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskCompletion {
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn todo_serializes_with_camel_case_due_date() {
        let todo = Todo {
            id: Uuid::nil(),
            name: "Groceries".to_string(),
            description: "Weekly run".to_string(),
            completed: false,
            due_date: Some(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()),
            tasks: Vec::new(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["dueDate"], "2026-01-15T10:00:00Z");
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn todo_absent_due_date_serializes_as_null() {
        let json = serde_json::to_value(Todo::default()).unwrap();
        assert!(json["dueDate"].is_null());
        assert_eq!(json["tasks"], serde_json::json!([]));
    }

    #[test]
    fn todo_decodes_with_every_field_optional() {
        let todo: Todo = serde_json::from_str("{}").unwrap();
        assert!(todo.id.is_nil());
        assert!(todo.name.is_empty());
        assert!(todo.due_date.is_none());
        assert!(todo.tasks.is_empty());
    }

    #[test]
    fn todo_roundtrips_through_json() {
        let todo = Todo {
            id: Uuid::new_v4(),
            name: "Move house".to_string(),
            description: String::new(),
            completed: true,
            due_date: Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap()),
            tasks: vec![Task {
                id: Uuid::new_v4(),
                name: "Pack boxes".to_string(),
                completed: false,
            }],
        };
        let json = serde_json::to_string(&todo).unwrap();
        let back: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn update_todo_defaults_match_zero_values() {
        let update: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(!update.completed);
        assert!(update.due_date.is_none());
    }

    #[test]
    fn task_completion_decodes_flag() {
        let completion: TaskCompletion =
            serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(completion.completed);
    }
}
