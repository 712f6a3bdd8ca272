//! Idempotency store error types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Errors from idempotency store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key already has a record; records are never overwritten.
    #[error("appeal key {key} already recorded at {recorded_at}")]
    AlreadyRecorded {
        key: String,
        recorded_at: DateTime<Utc>,
    },
    /// Another run holds the store lock.
    #[error("store {} is locked by another run (remove {} if no run is active)", .path.display(), .lock_path.display())]
    Locked { path: PathBuf, lock_path: PathBuf },
    /// Filesystem failure while reading or writing the store.
    #[error("I/O error on store {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The store file exists but does not parse.
    #[error("store {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The store file was written by an incompatible version.
    #[error("store {} has unsupported format version {version}", .path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },
    /// The backend refused the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
