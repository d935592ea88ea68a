//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers: thin plumbing that parses
//! user input, drives the task store and query engine, and prints the
//! results.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::path::PathBuf;

use chrono::Local;

use crate::fields::{Filter, Priority, SortKey};
use crate::notify::{check_due_reminders, ConsoleNotifier, Notifier};
use crate::query::{self, Query};
use crate::store::{format_due_relative, parse_due_input, TodoStore};
use crate::task::{Task, TaskPatch};
use crate::transfer::{export_all, import_all, TransferOutcome};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// The task text.
        text: String,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category label ("default" means uncategorised).
        #[arg(long, default_value = "default")]
        category: String,
    },

    /// List tasks with filter, search, and sort applied.
    List {
        /// Filter: all | active | completed | high-priority | category-<name>.
        #[arg(long, default_value = "all")]
        filter: String,
        /// Case-insensitive text/tag search.
        #[arg(long, default_value = "")]
        search: String,
        /// Sort key: date | priority | alphabetical | due-date.
        #[arg(long, default_value = "date")]
        sort: String,
    },

    /// Toggle a task between active and completed.
    Toggle {
        /// Task ID.
        id: u64,
    },

    /// Update fields on a task.
    Update {
        /// Task ID.
        id: u64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Remove every completed task.
    ClearCompleted,

    /// Add a tag to a task.
    Tag {
        /// Task ID.
        id: u64,
        tag: String,
    },

    /// Remove a tag from a task.
    Untag {
        /// Task ID.
        id: u64,
        tag: String,
    },

    /// Set or clear a task's due date.
    Due {
        /// Task ID.
        id: u64,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        date: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear: bool,
    },

    /// Show task counts and completion progress.
    Stats,

    /// Export all tasks to a JSON file.
    Export {
        /// Output file path.
        #[arg(long, short, default_value = "taskmaster-backup.json")]
        output: PathBuf,
    },

    /// Import tasks from a JSON file, replacing the current list.
    Import {
        /// Input file path.
        input: PathBuf,
    },

    /// Send reminders for tasks due today or overdue.
    Remind,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Add a new task to the store.
pub fn cmd_add(store: &mut TodoStore, text: String, priority: Priority, category: String) {
    let text = text.trim();
    if text.is_empty() {
        eprintln!("Task text cannot be empty.");
        std::process::exit(1);
    }
    let task = store.add(text, priority, category.trim());
    println!("Added task {}", task.id);
}

/// List tasks through the query engine.
pub fn cmd_list(store: &TodoStore, filter: String, search: String, sort: String) {
    let query = Query {
        filter: Filter::from(filter.as_str()),
        search,
        sort: SortKey::from(sort.as_str()),
    };
    let tasks = query::run(store.tasks(), &query);
    print_table(&tasks);
}

/// Toggle a task's completion state.
pub fn cmd_toggle(store: &mut TodoStore, id: u64) {
    store.toggle_completed(id);
    println!("Toggled task {id}");
}

/// Update fields on a task.
pub fn cmd_update(
    store: &mut TodoStore,
    id: u64,
    text: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
) {
    store.update(
        id,
        TaskPatch {
            text,
            priority,
            category,
        },
    );
    println!("Updated task {id}");
}

/// Delete a task.
pub fn cmd_delete(store: &mut TodoStore, id: u64) {
    store.delete(id);
    println!("Deleted task {id}");
}

/// Remove every completed task.
pub fn cmd_clear_completed(store: &mut TodoStore) {
    let before = store.total_count();
    store.clear_completed();
    println!("Cleared {} completed task(s)", before - store.total_count());
}

/// Add a tag to a task.
pub fn cmd_tag(store: &mut TodoStore, id: u64, tag: String) {
    store.add_tag(id, &tag);
    println!("Tagged task {id} with '{tag}'");
}

/// Remove a tag from a task.
pub fn cmd_untag(store: &mut TodoStore, id: u64, tag: String) {
    store.remove_tag(id, &tag);
    println!("Removed tag '{tag}' from task {id}");
}

/// Set or clear a task's due date.
pub fn cmd_due(store: &mut TodoStore, id: u64, date: Option<String>, clear: bool) {
    if clear {
        store.set_due_date(id, None);
        println!("Cleared due date on task {id}");
        return;
    }
    let Some(input) = date else {
        eprintln!("Provide a due date or pass --clear.");
        std::process::exit(1);
    };
    match parse_due_input(&input) {
        Some(d) => {
            store.set_due_date(id, Some(d));
            println!("Task {id} due {d}");
        }
        None => {
            eprintln!("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.");
            std::process::exit(1);
        }
    }
}

/// Print task counts and completion progress.
pub fn cmd_stats(store: &TodoStore) {
    let active = store.active_count();
    let total = store.total_count();
    let completed = store.completed_count();
    let percentage = if total == 0 {
        0
    } else {
        (completed * 100 + total / 2) / total
    };
    println!("{active} item{} left", if active == 1 { "" } else { "s" });
    println!("{completed} of {total} completed ({percentage}% Complete)");
}

/// Export all tasks to a JSON file.
pub fn cmd_export(store: &TodoStore, output: PathBuf) {
    report_outcome("Export", export_all(store, &output));
}

/// Import tasks from a JSON file.
pub fn cmd_import(store: &mut TodoStore, input: PathBuf) {
    report_outcome("Import", import_all(store, &input));
}

/// Scan for tasks due today or overdue and notify once per task.
pub fn cmd_remind(store: &TodoStore) {
    let today = Local::now().date_naive();
    check_due_reminders(store.tasks(), today, &ConsoleNotifier);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn report_outcome(action: &str, outcome: TransferOutcome) {
    let notifier = ConsoleNotifier;
    if outcome.success {
        notifier.show(&format!("{action} Successful"), &outcome.message);
    } else {
        notifier.show(&format!("{action} Failed"), &outcome.message);
        std::process::exit(1);
    }
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[Task]) {
    println!(
        "{:<14} {:<4} {:<8} {:<10} {:<12} {}",
        "ID", "Done", "Pri", "Due", "Category", "Text [tags]"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let done = if t.completed { "x" } else { "" };
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let due = format_due_relative(t.due_date, today);
        let category = if t.has_category() { t.category.as_str() } else { "-" };
        println!(
            "{:<14} {:<4} {:<8} {:<10} {:<12} {}{}",
            t.id,
            done,
            t.priority.label(),
            due,
            truncate(category, 12),
            t.text,
            tags
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= width {
            out.push('…');
            break;
        }
        out.push(ch);
    }
    out
}
