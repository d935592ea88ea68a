//! Task store and date utility functions.
//!
//! This module provides the `TodoStore` struct owning the authoritative
//! in-memory task collection, along with the due-date parsing and
//! formatting helpers shared by the command layer.

use chrono::{Duration, Local, NaiveDate, Utc};
use serde_json::json;
use tracing::warn;

use crate::fields::Priority;
use crate::storage::Storage;
use crate::task::{Task, TaskPatch};

/// Storage key the collection is persisted under.
pub const STORAGE_KEY: &str = "todos";

/// Owns the task collection and keeps it synchronized with the storage
/// boundary.
///
/// Every mutation rewrites the full collection through the storage port
/// before returning. The in-memory state is authoritative the moment a
/// mutation returns; durability follows whenever the storage write
/// lands (or is dropped by the storage layer).
pub struct TodoStore {
    tasks: Vec<Task>,
    storage: Box<dyn Storage>,
}

impl TodoStore {
    /// Create an empty store over the given storage. Call `load` to
    /// pick up previously persisted tasks.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        TodoStore {
            tasks: Vec::new(),
            storage,
        }
    }

    /// Replace the in-memory collection with whatever the storage
    /// currently holds. Absent or malformed data yields an empty list.
    /// Does not persist.
    pub fn load(&mut self) {
        let raw = self.storage.get(STORAGE_KEY, json!([]));
        self.tasks = match serde_json::from_value(raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "stored tasks unreadable, starting with an empty list");
                Vec::new()
            }
        };
    }

    /// Current collection, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Create a task and prepend it to the collection.
    pub fn add(&mut self, text: &str, priority: Priority, category: &str) -> Task {
        let task = Task::new(text, priority, category);
        self.tasks.insert(0, task.clone());
        self.persist();
        task
    }

    /// Merge the patch into the task with `id`. Each present field
    /// overwrites; a missing id is a no-op.
    pub fn update(&mut self, id: u64, patch: TaskPatch) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            if let Some(text) = patch.text {
                task.text = text;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(category) = patch.category {
                task.category = category;
            }
            self.persist();
        }
    }

    /// Flip completion; stamps `completed_at` on completion and clears
    /// it on reopen.
    pub fn toggle_completed(&mut self, id: u64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
            task.completed_at = if task.completed { Some(Utc::now()) } else { None };
            self.persist();
        }
    }

    /// Remove the task with `id`, if present.
    pub fn delete(&mut self, id: u64) {
        self.tasks.retain(|t| t.id != id);
        self.persist();
    }

    /// Remove every completed task.
    pub fn clear_completed(&mut self) {
        self.tasks.retain(|t| !t.completed);
        self.persist();
    }

    /// Append `tag` unless the task already carries it.
    pub fn add_tag(&mut self, id: u64, tag: &str) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            if !task.tags.iter().any(|t| t == tag) {
                task.tags.push(tag.to_string());
                self.persist();
            }
        }
    }

    /// Remove `tag` from the task's tag set if present.
    pub fn remove_tag(&mut self, id: u64, tag: &str) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.tags.retain(|t| t != tag);
            self.persist();
        }
    }

    /// Overwrite the due date; `None` clears it.
    pub fn set_due_date(&mut self, id: u64, date: Option<NaiveDate>) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.due_date = date;
            self.persist();
        }
    }

    /// Swap in a whole new collection (the import path) and persist it.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.persist();
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    fn persist(&mut self) {
        match serde_json::to_value(&self.tasks) {
            Ok(value) => self.storage.set(STORAGE_KEY, value),
            Err(e) => warn!(error = %e, "could not serialise tasks for storage"),
        }
    }
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "in Nd", "in Nw", and "YYYY-MM-DD".
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d') {
            if let Ok(days) = n.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(n) = rest.strip_suffix('w') {
            if let Ok(weeks) = n.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d",
/// "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(d) = due else {
        return "-".into();
    };
    let days = (d - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {n}d"),
        n => format!("{}d late", -n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStorage, MemoryStorage};

    fn store() -> TodoStore {
        TodoStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_applies_defaults_and_prepends() {
        let mut store = store();
        store.add("first", Priority::Medium, "default");
        // ids are creation timestamps; keep the adds in distinct ticks.
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.add("second", Priority::High, "home");

        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.tasks()[0].text, "second");
        assert_eq!(store.tasks()[0].id, second.id);
        assert!(!second.completed);
        assert!(second.tags.is_empty());
        assert_eq!(second.category, "home");
    }

    #[test]
    fn test_toggle_round_trip_restores_active_state() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            let mut store = store();
            let id = store.add("task", priority, "default").id;

            store.toggle_completed(id);
            assert!(store.tasks()[0].completed);
            assert!(store.tasks()[0].completed_at.is_some());

            store.toggle_completed(id);
            assert!(!store.tasks()[0].completed);
            assert!(store.tasks()[0].completed_at.is_none());
        }
    }

    #[test]
    fn test_mutations_on_missing_id_are_noops() {
        let mut store = store();
        let task = store.add("keep me", Priority::Medium, "default");

        store.toggle_completed(task.id + 1);
        store.delete(task.id + 1);
        store.add_tag(task.id + 1, "x");
        store.remove_tag(task.id + 1, "x");
        store.set_due_date(task.id + 1, None);
        store.update(task.id + 1, TaskPatch { text: Some("changed".into()), ..Default::default() });

        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0], task);
    }

    #[test]
    fn test_update_overwrites_only_present_fields() {
        let mut store = store();
        let id = store.add("draft", Priority::Low, "work").id;

        store.update(id, TaskPatch { priority: Some(Priority::High), ..Default::default() });

        let task = &store.tasks()[0];
        assert_eq!(task.text, "draft");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, "work");
    }

    #[test]
    fn test_add_tag_is_idempotent() {
        let mut store = store();
        let id = store.add("task", Priority::Medium, "default").id;

        store.add_tag(id, "urgent");
        store.add_tag(id, "urgent");
        store.add_tag(id, "bank");

        assert_eq!(store.tasks()[0].tags, vec!["urgent", "bank"]);
    }

    #[test]
    fn test_remove_tag() {
        let mut store = store();
        let id = store.add("task", Priority::Medium, "default").id;
        store.add_tag(id, "urgent");

        store.remove_tag(id, "urgent");
        store.remove_tag(id, "not-there");

        assert!(store.tasks()[0].tags.is_empty());
    }

    #[test]
    fn test_set_due_date_overwrites_and_clears() {
        let mut store = store();
        let id = store.add("task", Priority::Medium, "default").id;
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        store.set_due_date(id, Some(date));
        assert_eq!(store.tasks()[0].due_date, Some(date));

        store.set_due_date(id, None);
        assert_eq!(store.tasks()[0].due_date, None);
    }

    #[test]
    fn test_clear_completed_removes_only_completed() {
        let mut store = store();
        let done = store.add("done", Priority::Medium, "default").id;
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.add("open", Priority::Medium, "default");
        store.toggle_completed(done);

        store.clear_completed();

        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "open");
    }

    #[test]
    fn test_counts() {
        let mut store = store();
        let a = store.add("a", Priority::Medium, "default").id;
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.add("b", Priority::Medium, "default");
        store.toggle_completed(a);

        assert_eq!(store.total_count(), 2);
        assert_eq!(store.active_count(), 1);
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn test_load_defaults_to_empty_on_malformed_data() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, json!({"not": "an array"}));

        let mut store = TodoStore::new(Box::new(storage));
        store.load();

        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_mutations_persist_across_stores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut store = TodoStore::new(Box::new(JsonFileStorage::open(&path)));
        store.load();
        let id = store.add("persisted", Priority::High, "home").id;
        store.add_tag(id, "urgent");

        let mut reopened = TodoStore::new(Box::new(JsonFileStorage::open(&path)));
        reopened.load();

        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].text, "persisted");
        assert_eq!(reopened.tasks()[0].priority, Priority::High);
        assert_eq!(reopened.tasks()[0].tags, vec!["urgent"]);
    }

    #[test]
    fn test_add_then_query_end_to_end() {
        use crate::fields::{Filter, SortKey};
        use crate::query::{self, Query};

        let mut store = store();
        store.add("Buy milk", Priority::High, "home");
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.add("Pay rent", Priority::Medium, "default");

        assert_eq!(store.total_count(), 2);

        // Newest id sorts first under the default date sort.
        let by_date = query::run(store.tasks(), &Query::default());
        assert_eq!(by_date[0].text, "Pay rent");
        assert_eq!(by_date[1].text, "Buy milk");

        let high = query::run(
            store.tasks(),
            &Query {
                filter: Filter::HighPriority,
                search: String::new(),
                sort: SortKey::Date,
            },
        );
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].text, "Buy milk");
    }

    #[test]
    fn test_clear_completed_empties_completed_view() {
        use crate::fields::Filter;
        use crate::query::{self, Query};

        let mut store = store();
        let id = store.add("done soon", Priority::Medium, "default").id;
        store.toggle_completed(id);

        store.clear_completed();

        let completed = query::run(
            store.tasks(),
            &Query {
                filter: Filter::Completed,
                ..Default::default()
            },
        );
        assert!(completed.is_empty());
    }

    #[test]
    fn test_parse_due_input() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("Tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::weeks(2)));
        assert_eq!(
            parse_due_input("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(parse_due_input("someday"), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(
            format_due_relative(Some(today + Duration::days(1)), today),
            "tomorrow"
        );
        assert_eq!(
            format_due_relative(Some(today + Duration::days(3)), today),
            "in 3d"
        );
        assert_eq!(
            format_due_relative(Some(today - Duration::days(2)), today),
            "2d late"
        );
    }
}
