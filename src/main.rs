//! # Taskmaster - personal task list CLI
//!
//! A small, file-backed task manager: create, tag, categorise,
//! prioritise, and schedule due dates for short text items, then
//! filter/sort/search the resulting list.
//!
//! ## Key Features
//!
//! - **Rich Task Metadata**: Priority, category, tags, due dates, and
//!   completion timestamps
//! - **Composable Queries**: Named filters, free-text search, and four
//!   sort keys, combined independently
//! - **Local File Storage**: A single JSON file with import/export and
//!   atomic writes
//! - **Due-Date Reminders**: One-shot scan notifying for tasks due
//!   today or overdue
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! tm add "Buy milk" --priority high --category home
//!
//! # List active tasks matching a search, sorted by due date
//! tm list --filter active --search milk --sort due-date
//!
//! # Complete it
//! tm toggle 1714373400000
//!
//! # Counts and progress
//! tm stats
//! ```
//!
//! Data is stored locally in `~/.taskmaster/taskmaster-data.json`; pass
//! `--data` to use another file.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod notify;
pub mod query;
pub mod storage;
pub mod store;
pub mod task;
pub mod transfer;

use cli::Cli;
use cmd::*;
use storage::JsonFileStorage;
use store::TodoStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Completions don't need the data file.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let data_path = cli.data.clone().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskmaster");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("taskmaster-data.json")
    });

    let mut store = TodoStore::new(Box::new(JsonFileStorage::open(&data_path)));
    store.load();

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add {
            text,
            priority,
            category,
        } => cmd_add(&mut store, text, priority, category),

        Commands::List {
            filter,
            search,
            sort,
        } => cmd_list(&store, filter, search, sort),

        Commands::Toggle { id } => cmd_toggle(&mut store, id),

        Commands::Update {
            id,
            text,
            priority,
            category,
        } => cmd_update(&mut store, id, text, priority, category),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::ClearCompleted => cmd_clear_completed(&mut store),

        Commands::Tag { id, tag } => cmd_tag(&mut store, id, tag),

        Commands::Untag { id, tag } => cmd_untag(&mut store, id, tag),

        Commands::Due { id, date, clear } => cmd_due(&mut store, id, date, clear),

        Commands::Stats => cmd_stats(&store),

        Commands::Export { output } => cmd_export(&store, output),

        Commands::Import { input } => cmd_import(&mut store, input),

        Commands::Remind => cmd_remind(&store),
    }
}
