//! Flat-file store keeping all cache records in one JSON document
//!
//! The on-disk format is a single JSON object mapping each URL to its record:
//! `{ "<url>": { "timestamp": <ms>, "body": <json> }, ... }`. The whole
//! mapping is loaded at construction and rewritten on every `save`.

use super::{CacheRecord, Store};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// File name used under the default cache directory
const DEFAULT_FILE_NAME: &str = "responses.json";

/// A persistent store backed by a single JSON file
///
/// Loading never fails: a missing file yields an empty store, and a file
/// whose top level cannot be parsed is reported and replaced by an empty
/// store on the next save. Individual records with missing fields load fine
/// and are left for the cache's sweep to evict.
#[derive(Debug)]
pub struct FlatStore {
    /// Path of the backing file
    path: PathBuf,
    /// In-memory view of the persisted mapping
    entries: HashMap<String, CacheRecord>,
}

impl FlatStore {
    /// Loads a store from the given file path
    ///
    /// The file does not need to exist yet; it is created by the first `save`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read cache file, starting empty");
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    /// Loads a store from the XDG-compliant default location
    ///
    /// Uses `~/.cache/refcache/responses.json` on Linux, or the equivalent
    /// path on other platforms. Returns `None` if no cache directory can be
    /// determined (e.g., no home directory).
    pub fn open_default() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "refcache")?;
        let path = project_dirs.cache_dir().join(DEFAULT_FILE_NAME);
        Some(Self::load(path))
    }

    /// Returns the path of the backing file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Returns the number of records currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for FlatStore {
    fn get(&self, key: &str) -> Option<CacheRecord> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, record: CacheRecord) {
        self.entries.insert(key.to_string(), record);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn entries(&self) -> Vec<(String, CacheRecord)> {
        self.entries
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }
}
