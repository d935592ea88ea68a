//! Query engine: derives the presented task sequence from the store's
//! collection.
//!
//! Filtering, search, and sort are three independent parameters
//! composed as a pipeline over a snapshot copy; nothing here mutates
//! the store.

use chrono::NaiveDate;

use crate::fields::{Filter, Priority, SortKey};
use crate::task::Task;

/// The three presentation parameters, combined. The default query
/// shows everything, newest first.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Filter,
    pub search: String,
    pub sort: SortKey,
}

/// Run the filter, search, and sort stages over a snapshot of `tasks`.
pub fn run(tasks: &[Task], query: &Query) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| matches_filter(t, &query.filter))
        .filter(|t| matches_search(t, &query.search))
        .cloned()
        .collect();
    sort_tasks(&mut out, query.sort);
    out
}

fn matches_filter(task: &Task, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Active => !task.completed,
        Filter::Completed => task.completed,
        Filter::HighPriority => task.priority == Priority::High,
        Filter::Category(name) => task.category == *name,
    }
}

fn matches_search(task: &Task, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    task.text.to_lowercase().contains(&term)
        || task.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

/// All sorts are stable: ties keep the order they arrived in.
fn sort_tasks(tasks: &mut [Task], sort: SortKey) {
    match sort {
        SortKey::Priority => tasks.sort_by_key(|t| t.priority.rank()),
        SortKey::Alphabetical => {
            tasks.sort_by(|a, b| a.text.to_lowercase().cmp(&b.text.to_lowercase()))
        }
        // Tasks without a due date sort after every dated task.
        SortKey::DueDate => tasks.sort_by_key(|t| t.due_date.unwrap_or(NaiveDate::MAX)),
        SortKey::Date => tasks.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}
