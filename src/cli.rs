use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed personal task manager.
/// Data defaults to ~/.taskmaster/taskmaster-data.json or a path passed via --data.
#[derive(Parser)]
#[command(name = "tm", version, about = "Personal task list manager")]
pub struct Cli {
    /// Path to the JSON data file.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
