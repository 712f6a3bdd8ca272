//! # Run Summary
//!
//! Structured record of one run: counters, per-type frequency, one ordered
//! entry list per outcome, and anomalies. Built fresh by the aggregator and
//! never persisted by the engine; rendering is a separate step
//! (see [`crate::render`]).

use std::collections::BTreeMap;
use std::fmt;

use appeals_core::{
    ApprovalStatus, Channel, Creative, CreativeId, CreativeType, Decision, Disposition, PolicyTopic,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunMode
// ---------------------------------------------------------------------------

/// Whether eligible pairs are appealed or only planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunMode {
    /// Appeals are submitted and recorded.
    Live,
    /// Eligible pairs become `APPEAL_PLANNED`; no gateway call, no store write.
    DryRun,
}

impl RunMode {
    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::DryRun => "DRY_RUN",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Run-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCounters {
    /// Creatives consumed from the source.
    pub creatives_scanned: u64,
    /// Creatives with at least one policy topic.
    pub creatives_checked: u64,
    /// Creatives skipped for lack of policy data.
    pub creatives_without_topics: u64,
    /// (creative, topic) pairs classified.
    pub topics_reviewed: u64,
    pub appeals_submitted: u64,
    pub appeals_failed: u64,
    pub appeals_planned: u64,
    pub under_review: u64,
    pub already_appealed: u64,
    pub not_appealable: u64,
    /// Pairs flagged for manual review, independent of disposition.
    pub manual_review: u64,
}

impl RunCounters {
    /// Counter for one primary disposition.
    pub fn count(&self, disposition: Disposition) -> u64 {
        match disposition {
            Disposition::AppealSubmitted => self.appeals_submitted,
            Disposition::AppealFailed => self.appeals_failed,
            Disposition::AppealPlanned => self.appeals_planned,
            Disposition::UnderReview => self.under_review,
            Disposition::AlreadyAppealed => self.already_appealed,
            Disposition::NotAppealable => self.not_appealable,
        }
    }

    fn bump(&mut self, disposition: Disposition) {
        let counter = match disposition {
            Disposition::AppealSubmitted => &mut self.appeals_submitted,
            Disposition::AppealFailed => &mut self.appeals_failed,
            Disposition::AppealPlanned => &mut self.appeals_planned,
            Disposition::UnderReview => &mut self.under_review,
            Disposition::AlreadyAppealed => &mut self.already_appealed,
            Disposition::NotAppealable => &mut self.not_appealable,
        };
        *counter += 1;
    }

    /// Sum of all primary disposition counters.
    pub fn decisions(&self) -> u64 {
        Disposition::all().iter().map(|d| self.count(*d)).sum()
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One line of a report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub creative_id: CreativeId,
    #[serde(rename = "type")]
    pub creative_type: CreativeType,
    pub channel: Channel,
    pub campaign_name: String,
    pub group_name: String,
    pub approval_status: ApprovalStatus,
    /// Absent for creatives skipped before classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<PolicyTopic>,
    /// Failure message or other free-form detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SummaryEntry {
    /// Entry for a creative as a whole.
    pub fn for_creative(creative: &Creative) -> Self {
        Self {
            creative_id: creative.id.clone(),
            creative_type: creative.creative_type,
            channel: creative.channel,
            campaign_name: creative.campaign_name.clone(),
            group_name: creative.group_name.clone(),
            approval_status: creative.approval_status,
            topic: None,
            detail: None,
        }
    }

    /// Entry for one (creative, topic) pair.
    pub fn for_topic(creative: &Creative, topic: &PolicyTopic) -> Self {
        Self {
            topic: Some(topic.clone()),
            ..Self::for_creative(creative)
        }
    }

    /// Attach a detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for SummaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Campaign: {} | Group: {} | Ad ID: {} ({}, {}, {})",
            self.campaign_name,
            self.group_name,
            self.creative_id,
            self.creative_type,
            self.channel,
            self.approval_status,
        )?;
        if let Some(topic) = &self.topic {
            write!(f, " | Topic: {topic}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " | {detail}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// Conditions an operator should look at, beyond ordinary failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    /// The platform could not resolve a creative the listing returned.
    LookupAnomaly,
    /// The platform accepted an appeal but the store record was not written.
    StoreWriteFailure,
    /// A creative with topics produced no decision.
    NoActionTaken,
}

impl AnomalyKind {
    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LookupAnomaly => "LOOKUP_ANOMALY",
            Self::StoreWriteFailure => "STORE_WRITE_FAILURE",
            Self::NoActionTaken => "NO_ACTION_TAKEN",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One anomaly entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub entry: SummaryEntry,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.entry)
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Everything one run observed and did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub counters: RunCounters,
    /// Creatives scanned per type.
    pub creative_types: BTreeMap<CreativeType, u64>,
    pub submitted: Vec<SummaryEntry>,
    pub failed: Vec<SummaryEntry>,
    pub planned: Vec<SummaryEntry>,
    pub under_review: Vec<SummaryEntry>,
    pub already_appealed: Vec<SummaryEntry>,
    pub not_appealable: Vec<SummaryEntry>,
    pub manual_review: Vec<SummaryEntry>,
    pub skipped_no_topics: Vec<SummaryEntry>,
    pub anomalies: Vec<Anomaly>,
}

impl RunSummary {
    /// Start an empty summary stamped with a fresh run id.
    pub fn new(mode: RunMode) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            mode,
            started_at: Utc::now(),
            finished_at: None,
            counters: RunCounters::default(),
            creative_types: BTreeMap::new(),
            submitted: Vec::new(),
            failed: Vec::new(),
            planned: Vec::new(),
            under_review: Vec::new(),
            already_appealed: Vec::new(),
            not_appealable: Vec::new(),
            manual_review: Vec::new(),
            skipped_no_topics: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    /// Entries recorded under one primary disposition, in decision order.
    pub fn entries(&self, disposition: Disposition) -> &[SummaryEntry] {
        match disposition {
            Disposition::AppealSubmitted => &self.submitted,
            Disposition::AppealFailed => &self.failed,
            Disposition::AppealPlanned => &self.planned,
            Disposition::UnderReview => &self.under_review,
            Disposition::AlreadyAppealed => &self.already_appealed,
            Disposition::NotAppealable => &self.not_appealable,
        }
    }

    /// Anomalies of one kind.
    pub fn anomalies_of(&self, kind: AnomalyKind) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.kind == kind)
    }

    /// Whether any appeal went out without its store record.
    pub fn has_store_write_failures(&self) -> bool {
        self.anomalies_of(AnomalyKind::StoreWriteFailure).next().is_some()
    }

    /// Whether the report should be delivered.
    ///
    /// Only runs that submitted at least one appeal notify.
    pub fn should_notify(&self) -> bool {
        self.counters.appeals_submitted > 0
    }

    pub(crate) fn record_scanned(&mut self, creative: &Creative) {
        self.counters.creatives_scanned += 1;
        *self.creative_types.entry(creative.creative_type).or_insert(0) += 1;
    }

    pub(crate) fn record_without_topics(&mut self, creative: &Creative) {
        self.counters.creatives_without_topics += 1;
        self.skipped_no_topics.push(SummaryEntry::for_creative(creative));
    }

    pub(crate) fn record_checked(&mut self) {
        self.counters.creatives_checked += 1;
    }

    pub(crate) fn record_topic_reviewed(&mut self) {
        self.counters.topics_reviewed += 1;
    }

    pub(crate) fn record_decision(&mut self, decision: Decision, entry: SummaryEntry) {
        self.counters.bump(decision.disposition);
        if decision.manual_review {
            self.counters.manual_review += 1;
            self.manual_review.push(entry.clone());
        }
        let list = match decision.disposition {
            Disposition::AppealSubmitted => &mut self.submitted,
            Disposition::AppealFailed => &mut self.failed,
            Disposition::AppealPlanned => &mut self.planned,
            Disposition::UnderReview => &mut self.under_review,
            Disposition::AlreadyAppealed => &mut self.already_appealed,
            Disposition::NotAppealable => &mut self.not_appealable,
        };
        list.push(entry);
    }

    pub(crate) fn record_anomaly(&mut self, kind: AnomalyKind, entry: SummaryEntry) {
        self.anomalies.push(Anomaly { kind, entry });
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}
