//! # appeals-engine -- Appeal Decision Engine
//!
//! Runs one audit over a batch of creatives: classify every policy topic,
//! appeal what is eligible exactly once, and produce a structured
//! [`RunSummary`] for reporting.
//!
//! ## Components
//!
//! - [`AppealSubmitter`]: lookup, appeal, record. Never panics.
//! - [`RunAggregator`]: input-order walk with per-topic failure isolation;
//!   live or dry-run.
//! - [`RunSummary`]: counters, per-type frequency, per-outcome lists and
//!   anomalies. `Serialize` for machine consumption.
//! - [`SummaryRenderer`] / [`PlainTextRenderer`]: human report.
//! - [`notify_if_needed`]: sends the report only when something was
//!   submitted.
//!
//! ## Crate Policy
//!
//! - Collaborators are injected through the `appeals_core::ports` traits and
//!   [`appeals_store::IdempotencyStore`]; this crate performs no I/O itself.
//! - No `unwrap()` outside tests.

pub mod aggregator;
pub mod error;
pub mod notify;
pub mod render;
pub mod submitter;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{DisabledGateway, GatewayDisabled, RunAggregator};
pub use error::{RunError, SubmissionError};
pub use notify::{notify_if_needed, NotifyOutcome};
pub use render::{PlainTextRenderer, SummaryRenderer};
pub use submitter::AppealSubmitter;
pub use summary::{Anomaly, AnomalyKind, RunCounters, RunMode, RunSummary, SummaryEntry};
