//! Persistent translation cache.
//!
//! Entries live in memory behind a mutex and are written to a single JSON
//! file after every change. Storage problems never fail a translation: an
//! unreadable file starts an empty cache, and a failed write is logged.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::types::TranslationRequest;

/// Default upper bound on the number of cached translations.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Fingerprint-keyed store of finished translations.
///
/// Create one per process and share it through an `Arc`.
pub struct TranslationCache {
    path: Option<PathBuf>,
    capacity: usize,
    entries: Mutex<HashMap<String, String>>,
}

impl TranslationCache {
    /// Opens the cache stored at `path`, starting empty if the file is
    /// missing or unreadable.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!(path = %path.display(), entries = entries.len(), "translation cache loaded");
        Self {
            path: Some(path),
            capacity: capacity.max(1),
            entries: Mutex::new(entries),
        }
    }

    /// Creates a cache that is never written to disk.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            path: None,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, request: &TranslationRequest) -> Option<String> {
        self.entries.lock().get(&request.fingerprint()).cloned()
    }

    /// Stores one translation and flushes the cache before returning.
    pub fn set(&self, request: &TranslationRequest, translation: &str) {
        self.set_many([(request.clone(), translation.to_string())]);
    }

    /// Stores several translations with a single flush.
    pub fn set_many(&self, items: impl IntoIterator<Item = (TranslationRequest, String)>) {
        let mut entries = self.entries.lock();
        for (request, translation) in items {
            let key = request.fingerprint();
            if entries.len() >= self.capacity && !entries.contains_key(&key) {
                // Evicts whichever entry the map yields first; this is not LRU.
                if let Some(victim) = entries.keys().next().cloned() {
                    entries.remove(&victim);
                }
            }
            entries.insert(key, translation);
        }
        self.persist(&entries);
    }

    /// Removes every entry and flushes immediately.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
        self.persist(&entries);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes `entries` to disk. Callers hold the lock, which serializes writers.
    fn persist(&self, entries: &HashMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_entries(path, entries) {
            warn!(path = %path.display(), error = %e, "failed to persist translation cache");
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cannot read translation cache, starting empty"
            );
            return HashMap::new();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "corrupt translation cache, starting empty");
        HashMap::new()
    })
}

/// Writes through a sibling temp file so a crash never leaves a half-written cache.
fn write_entries(path: &Path, entries: &HashMap<String, String>) -> Result<(), crate::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, serde_json::to_vec(entries)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
