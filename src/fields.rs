//! Field types for tasks and list queries.
//!
//! This module defines the priority enum stored on each task plus the
//! filter and sort selectors the query engine accepts.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task priority. Drives the badge shown next to a task and the
/// `priority` sort order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank: high before medium before low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// View filter applied before search and sort.
///
/// Parsing never fails: an unrecognised selector is treated as `All`,
/// so stale or misspelled filter values show everything instead of
/// erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    HighPriority,
    Category(String),
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        match s {
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            "high-priority" => Filter::HighPriority,
            _ => match s.strip_prefix("category-") {
                Some(name) => Filter::Category(name.to_string()),
                None => Filter::All,
            },
        }
    }
}

/// Sort key for the presented list. Unrecognised values fall back to
/// `Date`, the same graceful default the filter parser uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest created first.
    #[default]
    Date,
    Priority,
    Alphabetical,
    DueDate,
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s {
            "priority" => SortKey::Priority,
            "alphabetical" => SortKey::Alphabetical,
            "dueDate" | "due-date" => SortKey::DueDate,
            _ => SortKey::Date,
        }
    }
}
