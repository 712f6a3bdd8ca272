//! Notification gate.
//!
//! A report goes out only when the run submitted at least one appeal. Runs
//! that only observed (or only failed) stay silent; their summary is still
//! logged and may be written to disk by the caller.

use appeals_core::ReportSink;

use crate::render::SummaryRenderer;
use crate::summary::RunSummary;

/// What the gate did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    Suppressed,
}

/// Render and send `summary` to `to` if it submitted any appeal.
pub async fn notify_if_needed<K, R>(
    sink: &K,
    renderer: &R,
    to: &str,
    summary: &RunSummary,
) -> Result<NotifyOutcome, K::Error>
where
    K: ReportSink,
    R: SummaryRenderer + ?Sized,
{
    if !summary.should_notify() {
        tracing::info!(run_id = %summary.run_id, "no appeals submitted; report suppressed");
        return Ok(NotifyOutcome::Suppressed);
    }

    let subject = renderer.subject(summary);
    let body = renderer.body(summary);
    sink.send(to, &subject, &body).await?;
    tracing::info!(run_id = %summary.run_id, %to, "report sent");
    Ok(NotifyOutcome::Sent)
}
