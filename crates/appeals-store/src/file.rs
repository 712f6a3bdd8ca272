//! # JSON File Store
//!
//! Persists the idempotency map as a single JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "681234::MISLEADING_CLAIM": "2026-03-02T07:15:00Z"
//!   }
//! }
//! ```
//!
//! Every [`IdempotencyStore::set`] rewrites the whole document through a
//! temporary file in the same directory followed by an atomic rename, so a
//! crash mid-write leaves the previous document intact.
//!
//! ## Run exclusivity
//!
//! Opening a store creates `<path>.lock` with `create_new`; the lock is
//! removed when the handle drops. A second open while the lock exists fails
//! with [`StoreError::Locked`], which closes the check-then-act window
//! between reading a key and recording it. A lock left behind by a crashed
//! run must be removed by an operator.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use appeals_core::AppealKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IdempotencyStore, StoreError};

/// Current on-disk format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<AppealKey, DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// RunLock
// ---------------------------------------------------------------------------

/// Exclusive lock file guarding a store path.
#[derive(Debug)]
struct RunLock {
    path: PathBuf,
}

impl RunLock {
    fn acquire(store_path: &Path) -> Result<Self, StoreError> {
        let lock_path = lock_path_for(store_path);
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Locked {
                    path: store_path.to_path_buf(),
                    lock_path,
                });
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: lock_path,
                    source: e,
                });
            }
        };
        // Informational only; the lock is the file's existence.
        let _ = writeln!(file, "pid={} acquired_at={}", std::process::id(), Utc::now().to_rfc3339());
        Ok(Self { path: lock_path })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}

fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Durable idempotency store backed by one JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<AppealKey, DateTime<Utc>>,
    _lock: RunLock,
}

impl JsonFileStore {
    /// Open (or create) the store at `path` and take its run lock.
    ///
    /// A missing file is an empty store; the file is first written on the
    /// first successful `set`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let lock = RunLock::acquire(&path)?;
        let entries = load(&path)?;
        tracing::debug!(store = %path.display(), entries = entries.len(), "opened idempotency store");

        Ok(Self {
            path,
            entries,
            _lock: lock,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&AppealKey, &DateTime<Utc>)> {
        self.entries.iter()
    }

    /// Operator action: delete the record for `key`, making the pair
    /// eligible for appeal again. Returns the removed timestamp.
    pub fn remove(&mut self, key: &AppealKey) -> Result<Option<DateTime<Utc>>, StoreError> {
        let Some(removed) = self.entries.remove(key) else {
            return Ok(None);
        };
        if let Err(e) = self.persist() {
            self.entries.insert(key.clone(), removed);
            return Err(e);
        }
        tracing::info!(key = %key, "removed appeal record");
        Ok(Some(removed))
    }

    /// Operator action: delete every record. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }
        tracing::info!(removed = previous.len(), "cleared appeal records");
        Ok(previous.len())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let document = StoreDocument {
            version: STORE_FORMAT_VERSION,
            entries: self.entries.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&document).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl IdempotencyStore for JsonFileStore {
    fn get(&self, key: &AppealKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: &AppealKey, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(existing) = self.entries.get(key) {
            return Err(StoreError::AlreadyRecorded {
                key: key.to_string(),
                recorded_at: *existing,
            });
        }
        self.entries.insert(key.clone(), at);
        if let Err(e) = self.persist() {
            // Memory must not claim a record the disk does not have.
            self.entries.remove(key);
            return Err(e);
        }
        Ok(())
    }
}

fn load(path: &Path) -> Result<BTreeMap<AppealKey, DateTime<Utc>>, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    let document: StoreDocument =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            source: e,
        })?;
    if document.version != STORE_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: document.version,
        });
    }
    Ok(document.entries)
}
