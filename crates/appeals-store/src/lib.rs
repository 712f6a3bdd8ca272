//! # appeals-store -- Idempotency Store
//!
//! Durable record of which (creative, policy topic) pairs have already had
//! an appeal attempted. The store is what makes appeal submission
//! at-most-once across arbitrarily many runs.
//!
//! ## Invariants
//!
//! - A key is written at most once. [`IdempotencyStore::set`] on a recorded
//!   key fails with [`StoreError::AlreadyRecorded`]; records never expire
//!   and are never overwritten.
//! - Only an explicit operator action ([`JsonFileStore::remove`],
//!   [`JsonFileStore::clear`]) deletes a record.
//! - At most one run uses a store at a time. [`JsonFileStore`] enforces this
//!   with a lock file held for the lifetime of the handle.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-process map for tests and dry runs.
//! - [`JsonFileStore`]: JSON document on disk, rewritten atomically on
//!   every `set`.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use appeals_core::AppealKey;
use chrono::{DateTime, Utc};

/// Key → first-appeal timestamp mapping.
pub trait IdempotencyStore {
    /// Timestamp of the recorded appeal for `key`, if any.
    fn get(&self, key: &AppealKey) -> Option<DateTime<Utc>>;

    /// Record `key` as appealed at `at`.
    ///
    /// Must be durable before returning `Ok`. Fails without side effects if
    /// the key is already recorded.
    fn set(&mut self, key: &AppealKey, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Whether `key` has a recorded appeal.
    fn is_recorded(&self, key: &AppealKey) -> bool {
        self.get(key).is_some()
    }
}

impl<S: IdempotencyStore + ?Sized> IdempotencyStore for &mut S {
    fn get(&self, key: &AppealKey) -> Option<DateTime<Utc>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &AppealKey, at: DateTime<Utc>) -> Result<(), StoreError> {
        (**self).set(key, at)
    }
}
