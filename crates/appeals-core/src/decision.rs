//! # Policy Classifier
//!
//! Maps one (creative, policy topic entry) pair to a decision. The
//! classifier is a pure, deterministic, total function: it performs no I/O,
//! reads the idempotency store only through the `already_appealed` flag the
//! caller supplies, and every legal input maps to exactly one [`Verdict`].
//!
//! ## Decision table
//!
//! Evaluated in priority order, first match wins:
//!
//! | # | Condition | Verdict |
//! |---|-----------|---------|
//! | 1 | appealable, not under review, not already appealed, channel allows automatic appeal | [`Verdict::Appeal`] |
//! | 2 | under review | [`Verdict::UnderReview`] |
//! | 3 | appealable and already appealed | [`Verdict::AlreadyAppealed`] |
//! | 4 | otherwise | [`Verdict::NotAppealable`] |
//!
//! The manual-review flag is orthogonal: it is set iff the channel is
//! `MULTI_CHANNEL` or `PERFORMANCE_MAX`, whatever row matched. Those
//! channels never reach row 1, so their primary outcome always comes from
//! rows 2–4.

use serde::{Deserialize, Serialize};

use crate::creative::{Creative, PolicyTopicEntry};

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Primary outcome of classification, before any appeal is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Eligible for an appeal attempt; the submitter decides the final disposition.
    Appeal,
    /// The platform is already re-reviewing the topic.
    UnderReview,
    /// An appeal for this pair was recorded by an earlier attempt.
    AlreadyAppealed,
    /// No automatic appeal is possible.
    NotAppealable,
}

impl Verdict {
    /// The final disposition for verdicts that need no appeal attempt.
    ///
    /// Returns `None` for [`Verdict::Appeal`], whose disposition depends on
    /// the submission result.
    pub fn skip_disposition(&self) -> Option<Disposition> {
        match self {
            Self::Appeal => None,
            Self::UnderReview => Some(Disposition::UnderReview),
            Self::AlreadyAppealed => Some(Disposition::AlreadyAppealed),
            Self::NotAppealable => Some(Disposition::NotAppealable),
        }
    }
}

// ---------------------------------------------------------------------------
// Disposition
// ---------------------------------------------------------------------------

/// Final primary disposition of one (creative, topic) pair in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    /// The appeal was accepted by the platform and recorded.
    AppealSubmitted,
    /// The appeal attempt failed (lookup, platform or store write).
    AppealFailed,
    /// Dry run only: the pair would have been appealed.
    AppealPlanned,
    /// The platform is already re-reviewing the topic.
    UnderReview,
    /// An appeal for this pair was recorded by an earlier attempt.
    AlreadyAppealed,
    /// No automatic appeal is possible.
    NotAppealable,
}

impl Disposition {
    /// All dispositions in report order.
    pub fn all() -> &'static [Disposition] {
        &[
            Self::AppealSubmitted,
            Self::AppealFailed,
            Self::AppealPlanned,
            Self::UnderReview,
            Self::AlreadyAppealed,
            Self::NotAppealable,
        ]
    }

    /// Return the string value for serialization and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppealSubmitted => "APPEAL_SUBMITTED",
            Self::AppealFailed => "APPEAL_FAILED",
            Self::AppealPlanned => "APPEAL_PLANNED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::AlreadyAppealed => "ALREADY_APPEALED",
            Self::NotAppealable => "NOT_APPEALABLE",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification / Decision
// ---------------------------------------------------------------------------

/// Classifier output: a primary verdict plus the manual-review flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Primary outcome.
    pub verdict: Verdict,
    /// Set iff the creative's channel requires human review.
    pub manual_review: bool,
}

impl Classification {
    /// Whether the submitter must be invoked for this pair.
    pub fn is_appeal_eligible(&self) -> bool {
        self.verdict == Verdict::Appeal
    }

    /// Settle the classification into a decision with the given disposition.
    ///
    /// Used once the submission outcome of an eligible pair is known.
    pub fn settle(self, disposition: Disposition) -> Decision {
        Decision {
            disposition,
            manual_review: self.manual_review,
        }
    }

    /// The decision for a classification that needs no appeal attempt.
    pub fn skip_decision(self) -> Option<Decision> {
        self.verdict.skip_disposition().map(|d| self.settle(d))
    }
}

/// Final decision for one (creative, topic) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Exactly one primary disposition.
    pub disposition: Disposition,
    /// Orthogonal manual-review flag.
    pub manual_review: bool,
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Classify one topic entry of a creative.
///
/// `already_appealed` is the caller's read of the idempotency store for the
/// key `creative.id::entry.topic`.
pub fn classify(creative: &Creative, entry: &PolicyTopicEntry, already_appealed: bool) -> Classification {
    let verdict = if entry.appealable
        && !entry.under_review
        && !already_appealed
        && creative.channel.allows_automatic_appeal()
    {
        Verdict::Appeal
    } else if entry.under_review {
        Verdict::UnderReview
    } else if entry.appealable && already_appealed {
        Verdict::AlreadyAppealed
    } else {
        Verdict::NotAppealable
    };

    Classification {
        verdict,
        manual_review: creative.channel.requires_manual_review(),
    }
}
