//! In-memory idempotency store.
//!
//! Nothing survives the process. Used by tests, by dry runs that must not
//! touch the real store, and as the reference behaviour for other backends.

use std::collections::BTreeMap;

use appeals_core::AppealKey;
use chrono::{DateTime, Utc};

use crate::{IdempotencyStore, StoreError};

/// Idempotency store backed by a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<AppealKey, DateTime<Utc>>,
    write_failure: Option<String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with [`StoreError::Unavailable`].
    ///
    /// Lets callers exercise the remote-success / local-record-failure path.
    pub fn with_write_failure(mut self, message: impl Into<String>) -> Self {
        self.write_failure = Some(message.into());
        self
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
}

impl IdempotencyStore for MemoryStore {
    fn get(&self, key: &AppealKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: &AppealKey, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(message) = &self.write_failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        if let Some(existing) = self.entries.get(key) {
            return Err(StoreError::AlreadyRecorded {
                key: key.to_string(),
                recorded_at: *existing,
            });
        }
        self.entries.insert(key.clone(), at);
        Ok(())
    }
}
