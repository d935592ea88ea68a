//! Task data structure.
//!
//! This module defines the core `Task` struct representing a single
//! to-do item, and the `TaskPatch` struct used for partial updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// Category label used when a task has no explicit grouping.
pub const DEFAULT_CATEGORY: &str = "default";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A single to-do item with priority, tags, category, optional due
/// date, and completion state.
///
/// The serialized shape (camelCase keys, ISO-8601 timestamps, plain
/// `YYYY-MM-DD` due dates) is the persisted on-disk contract and must
/// stay readable across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation time in milliseconds. Two tasks created within the
    /// same millisecond collide; the scheme is kept as-is for data
    /// compatibility.
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Task {
    /// Construct a task stamped with the current time and the
    /// documented defaults: not completed, no due date, no tags.
    pub fn new(text: &str, priority: Priority, category: &str) -> Self {
        let now = Utc::now();
        Task {
            id: now.timestamp_millis() as u64,
            text: text.to_string(),
            completed: false,
            completed_at: None,
            priority,
            created_at: now,
            due_date: None,
            tags: Vec::new(),
            category: category.to_string(),
        }
    }

    /// True when the task carries an explicit grouping label.
    pub fn has_category(&self) -> bool {
        self.category != DEFAULT_CATEGORY
    }
}

/// Field-by-field update applied by the store's `update` operation.
/// Present fields overwrite; absent fields leave the task unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Buy milk", Priority::Medium, DEFAULT_CATEGORY);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.due_date.is_none());
        assert!(task.tags.is_empty());
        assert!(!task.has_category());
    }

    #[test]
    fn test_persisted_shape_uses_camel_case() {
        let task = Task::new("Pay rent", Priority::High, "home");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["priority"], "high");
        assert_eq!(value["category"], "home");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("dueDate").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_deserialize_fills_missing_optional_fields() {
        // Records written before tags/categories existed still load.
        let raw = r#"{"id": 1700000000000, "text": "Old task", "createdAt": "2023-11-14T22:13:20Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, DEFAULT_CATEGORY);
        assert!(task.tags.is_empty());
        assert!(!task.completed);
    }
}
