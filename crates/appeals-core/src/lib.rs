//! # appeals-core -- Foundational Types for Creative Policy Appeals
//!
//! Every other crate in the workspace depends on `appeals-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** [`CreativeId`], [`GroupId`] and
//!    [`PolicyTopic`] are validated at construction and at deserialization.
//!    No bare strings reach the idempotency store.
//!
//! 2. **One key format.** [`AppealKey`] is the only way to name a
//!    (creative, topic) pair; its string form `creativeId::topic` is what
//!    gets persisted.
//!
//! 3. **Pure classifier.** [`classify`] has no side effects and is total over
//!    every (appealable, under review, already appealed, channel) tuple.
//!
//! 4. **Ports, not clients.** The platform, the creative export and the
//!    report channel are traits in [`ports`]; this crate performs no I/O.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `appeals-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod creative;
pub mod decision;
pub mod error;
pub mod identity;
pub mod key;
pub mod ports;

// Re-export primary types for ergonomic imports.
pub use creative::{ApprovalStatus, Channel, Creative, CreativeType, PolicyTopicEntry};
pub use decision::{classify, Classification, Decision, Disposition, Verdict};
pub use error::ValidationError;
pub use identity::{CreativeId, GroupId, PolicyTopic, KEY_SEPARATOR};
pub use key::AppealKey;
pub use ports::{AppealGateway, AppealTarget, CreativeSource, ReportSink};
