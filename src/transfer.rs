//! Whole-file JSON import and export.
//!
//! Export writes the current collection as a pretty-printed JSON array.
//! Import replaces the collection with the contents of a file holding
//! such an array; anything else is rejected and the existing collection
//! is left untouched.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::store::TodoStore;
use crate::task::Task;

/// Result reported back to the caller of an import or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub success: bool,
    pub message: String,
}

impl TransferOutcome {
    fn ok(message: impl Into<String>) -> Self {
        TransferOutcome {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        TransferOutcome {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
enum ImportError {
    #[error("Invalid task data format")]
    NotAnArray,
    #[error("Import failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Import failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Write the current collection as pretty-printed JSON to `path`.
pub fn export_all(store: &TodoStore, path: &Path) -> TransferOutcome {
    let data = serde_json::to_string_pretty(store.tasks()).unwrap();
    match fs::write(path, data) {
        Ok(()) => TransferOutcome::ok("Tasks exported successfully"),
        Err(e) => TransferOutcome::failed(format!("Export failed: {e}")),
    }
}

/// Replace the collection with the contents of `path`. On any failure
/// the in-memory collection is unchanged.
pub fn import_all(store: &mut TodoStore, path: &Path) -> TransferOutcome {
    match read_tasks(path) {
        Ok(tasks) => {
            store.replace_all(tasks);
            TransferOutcome::ok("Tasks imported successfully")
        }
        Err(e) => TransferOutcome::failed(e.to_string()),
    }
}

fn read_tasks(path: &Path) -> Result<Vec<Task>, ImportError> {
    let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    if !value.is_array() {
        return Err(ImportError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}
