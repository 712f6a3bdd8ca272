//! Engine error types.
//!
//! Per-topic failures ([`SubmissionError`]) are caught by the aggregator and
//! turned into summary entries. Only [`RunError`] escapes a run.

use appeals_core::{AppealKey, CreativeId, GroupId};
use appeals_store::StoreError;

/// Why one appeal attempt did not complete.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The platform could not resolve the creative the listing referenced.
    #[error("creative {creative_id} in group {group_id} could not be resolved for appeal")]
    NotFound {
        creative_id: CreativeId,
        group_id: GroupId,
    },
    /// The lookup or the appeal action errored; carries the platform message verbatim.
    #[error("{0}")]
    SubmissionFailed(String),
    /// The platform accepted the appeal but the idempotency record was not written.
    #[error("appeal accepted but record {key} could not be stored: {source}")]
    StoreWrite { key: AppealKey, source: StoreError },
}

/// Run-fatal failure.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    /// The creative source could not produce the run's input.
    #[error("creative source failed: {source}")]
    Source { source: E },
}
