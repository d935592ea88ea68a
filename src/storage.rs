//! Key-value storage boundary.
//!
//! The task store persists its collection through the `Storage` trait
//! rather than touching the filesystem directly. Implementations absorb
//! their own I/O failures: a failed write is logged and dropped, a
//! failed read resolves to the caller-supplied default. The caller's
//! in-memory state stays authoritative either way.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::warn;

/// Key-value blob store consumed by the task store.
///
/// `get` never fails from the caller's point of view. `set` is
/// fire-and-forget: no acknowledgment reaches the caller and a dropped
/// write leaves in-memory state ahead of persisted state until the next
/// successful write.
pub trait Storage {
    fn get(&self, key: &str, default: Value) -> Value;
    fn set(&mut self, key: &str, value: Value);
    fn delete(&mut self, key: &str) -> Option<Value>;
}

/// Single-file JSON object store, one key per top-level field.
///
/// Matches the shape the original data files use: the file holds one
/// JSON object and each `set` rewrites the whole file via a temp file
/// and rename.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl JsonFileStorage {
    /// Open the store at `path`, reading any existing entries. A
    /// missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        JsonFileStorage {
            path: path.to_path_buf(),
            entries: read_entries(path),
        }
    }

    fn flush(&self) {
        let data = serde_json::to_string_pretty(&self.entries).unwrap();
        if let Err(e) = write_atomic(&self.path, &data) {
            warn!(path = %self.path.display(), error = %e, "store write failed, keeping in-memory state");
        }
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str, default: Value) -> Value {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
        self.flush();
    }

    fn delete(&mut self, key: &str) -> Option<Value> {
        let previous = self.entries.remove(key);
        if previous.is_some() {
            self.flush();
        }
        previous
    }
}

fn read_entries(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        return Map::new();
    }
    let mut buf = String::new();
    match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
        Ok(_) => match serde_json::from_str::<Value>(&buf) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(path = %path.display(), "store file is not a JSON object, starting fresh");
                Map::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error parsing store file, starting fresh");
                Map::new()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error reading store file, starting fresh");
            Map::new()
        }
    }
}

/// Write via temp + rename so a crash mid-write never truncates the
/// previous contents.
fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Volatile map-backed store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Map<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str, default: Value) -> Value {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }
}
