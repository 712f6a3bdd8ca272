//! # Run Aggregator
//!
//! Drives one run: walks creatives in input order, classifies every policy
//! topic against the idempotency store, invokes the [`AppealSubmitter`] for
//! eligible pairs, and accumulates the [`RunSummary`].
//!
//! ## Failure Isolation
//!
//! A failed lookup, appeal or store write is recorded against its pair and
//! the run moves on. The only way a run fails is the creative source
//! failing, which happens before any decision is taken
//! ([`RunAggregator::run_source`]).
//!
//! ## Sequencing
//!
//! Every await happens in sequence. The store read for a pair happens
//! immediately before its classification, so a pair appealed earlier in the
//! same run (for instance a duplicate listing) is seen as already appealed.
//! Pairs the platform accepted this run are also remembered in memory, so a
//! store write that failed cannot lead to a second appeal before the run
//! ends.

use std::collections::HashSet;

use appeals_core::{
    classify, AppealGateway, AppealKey, AppealTarget, Creative, CreativeId, CreativeSource,
    Disposition, GroupId, PolicyTopic,
};
use appeals_store::IdempotencyStore;
use tracing::Instrument;

use crate::error::{RunError, SubmissionError};
use crate::submitter::AppealSubmitter;
use crate::summary::{AnomalyKind, RunMode, RunSummary, SummaryEntry};

/// Gateway for dry runs. Every call fails; the aggregator never makes one
/// in [`RunMode::DryRun`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

/// Returned by [`DisabledGateway`].
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("appeal gateway is disabled in dry-run mode")]
pub struct GatewayDisabled;

impl AppealGateway for DisabledGateway {
    type Error = GatewayDisabled;

    async fn find_creative(
        &self,
        _group_id: &GroupId,
        _creative_id: &CreativeId,
    ) -> Result<Option<AppealTarget>, GatewayDisabled> {
        Err(GatewayDisabled)
    }

    async fn appeal(
        &self,
        _target: &AppealTarget,
        _justification: &str,
        _topics: &[PolicyTopic],
    ) -> Result<(), GatewayDisabled> {
        Err(GatewayDisabled)
    }
}

/// Runs the decision pipeline over a batch of creatives.
#[derive(Debug)]
pub struct RunAggregator<'a, S: ?Sized, G> {
    store: &'a mut S,
    gateway: &'a G,
    justification: &'a str,
    mode: RunMode,
}

impl<'a, S, G> RunAggregator<'a, S, G>
where
    S: IdempotencyStore + ?Sized,
    G: AppealGateway,
{
    /// Create a live aggregator.
    pub fn new(store: &'a mut S, gateway: &'a G, justification: &'a str) -> Self {
        Self {
            store,
            gateway,
            justification,
            mode: RunMode::Live,
        }
    }

    /// Set the run mode.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// The configured run mode.
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Fetch creatives from `source`, then [`run`](Self::run) them.
    ///
    /// A source failure aborts before any decision is taken.
    pub async fn run_source<Src>(&mut self, source: &Src) -> Result<RunSummary, RunError<Src::Error>>
    where
        Src: CreativeSource,
    {
        let creatives = match source.fetch_creatives().await {
            Ok(creatives) => creatives,
            Err(source) => {
                tracing::error!(error = %source, "creative source failed; aborting run");
                return Err(RunError::Source { source });
            }
        };
        tracing::info!(creatives = creatives.len(), "creative source fetched");
        Ok(self.run(creatives).await)
    }

    /// Process `creatives` in order and return the run summary.
    pub async fn run<I>(&mut self, creatives: I) -> RunSummary
    where
        I: IntoIterator<Item = Creative>,
    {
        let mut summary = RunSummary::new(self.mode);
        let span = tracing::info_span!("run", run_id = %summary.run_id, mode = %self.mode);
        let mut appealed = HashSet::new();
        async {
            tracing::info!("run started");
            for creative in creatives {
                self.process_creative(&creative, &mut appealed, &mut summary).await;
            }
        }
        .instrument(span.clone())
        .await;

        summary.finish();
        let _enter = span.enter();
        let c = &summary.counters;
        tracing::info!(
            creatives_scanned = c.creatives_scanned,
            creatives_checked = c.creatives_checked,
            topics_reviewed = c.topics_reviewed,
            appeals_submitted = c.appeals_submitted,
            appeals_failed = c.appeals_failed,
            appeals_planned = c.appeals_planned,
            under_review = c.under_review,
            already_appealed = c.already_appealed,
            not_appealable = c.not_appealable,
            manual_review = c.manual_review,
            anomalies = summary.anomalies.len(),
            "run finished"
        );
        summary
    }

    /// `appealed` holds the pairs the platform accepted earlier in this run.
    async fn process_creative(
        &mut self,
        creative: &Creative,
        appealed: &mut HashSet<AppealKey>,
        summary: &mut RunSummary,
    ) {
        summary.record_scanned(creative);

        if !creative.has_policy_data() {
            tracing::debug!(creative_id = %creative.id, "no policy topics; skipped");
            summary.record_without_topics(creative);
            return;
        }
        summary.record_checked();

        let decided_before = summary.counters.decisions();
        for entry in &creative.policy_topics {
            summary.record_topic_reviewed();
            let key = AppealKey::new(&creative.id, &entry.topic);
            let already_appealed = self.store.is_recorded(&key) || appealed.contains(&key);
            let classification = classify(creative, entry, already_appealed);
            tracing::debug!(
                creative_id = %creative.id,
                topic = %entry.topic,
                verdict = ?classification.verdict,
                manual_review = classification.manual_review,
                "classified"
            );

            let line = SummaryEntry::for_topic(creative, &entry.topic);
            let decision = match classification.skip_decision() {
                Some(decision) => decision,
                None => match self.mode {
                    RunMode::DryRun => {
                        tracing::info!(%key, "appeal planned (dry run)");
                        classification.settle(Disposition::AppealPlanned)
                    }
                    RunMode::Live => {
                        let outcome = AppealSubmitter::new(self.gateway)
                            .submit(
                                &mut *self.store,
                                &creative.id,
                                &creative.group_id,
                                &entry.topic,
                                self.justification,
                            )
                            .await;
                        match outcome {
                            Ok(()) => {
                                tracing::info!(%key, "appeal submitted");
                                appealed.insert(key);
                                classification.settle(Disposition::AppealSubmitted)
                            }
                            Err(err) => {
                                if matches!(err, SubmissionError::StoreWrite { .. }) {
                                    appealed.insert(key.clone());
                                }
                                self.record_failure(&key, &err, &line, summary);
                                summary.record_decision(
                                    classification.settle(Disposition::AppealFailed),
                                    line.with_detail(err.to_string()),
                                );
                                continue;
                            }
                        }
                    }
                },
            };
            summary.record_decision(decision, line);
        }

        if summary.counters.decisions() == decided_before {
            tracing::warn!(creative_id = %creative.id, "creative with topics produced no decision");
            summary.record_anomaly(AnomalyKind::NoActionTaken, SummaryEntry::for_creative(creative));
        }
    }

    fn record_failure(
        &self,
        key: &AppealKey,
        err: &SubmissionError,
        line: &SummaryEntry,
        summary: &mut RunSummary,
    ) {
        match err {
            SubmissionError::NotFound { .. } => {
                tracing::warn!(%key, error = %err, "lookup anomaly");
                summary.record_anomaly(
                    AnomalyKind::LookupAnomaly,
                    line.clone().with_detail(err.to_string()),
                );
            }
            SubmissionError::SubmissionFailed(_) => {
                tracing::warn!(%key, error = %err, "appeal failed");
            }
            SubmissionError::StoreWrite { .. } => {
                tracing::error!(%key, error = %err, "appeal submitted but not recorded");
                summary.record_anomaly(
                    AnomalyKind::StoreWriteFailure,
                    line.clone().with_detail(err.to_string()),
                );
            }
        }
    }
}
