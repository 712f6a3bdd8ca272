//! # Report Rendering
//!
//! Turns a [`RunSummary`] into a subject line and a plain-text body. The
//! summary itself stays structured; renderers are swappable.

use appeals_core::Disposition;

use crate::summary::{RunMode, RunSummary, SummaryEntry};

/// Renders a run summary for human delivery.
pub trait SummaryRenderer {
    /// One-line subject.
    fn subject(&self, summary: &RunSummary) -> String;

    /// Full report body.
    fn body(&self, summary: &RunSummary) -> String;
}

/// Section headings in report order, after anomalies.
const SECTIONS: &[(Disposition, &str)] = &[
    (Disposition::AppealSubmitted, "Appeals submitted"),
    (Disposition::AppealFailed, "Appeals failed"),
    (Disposition::AppealPlanned, "Appeals planned (dry run)"),
    (Disposition::UnderReview, "Already under review"),
    (Disposition::AlreadyAppealed, "Already appealed"),
    (Disposition::NotAppealable, "Not appealable"),
];

/// Plain-text report: totals, per-type frequency, then one section per
/// non-empty outcome list. Anomalies come first.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer {
    account_label: Option<String>,
}

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the account in the subject line.
    pub fn with_account_label(mut self, label: impl Into<String>) -> Self {
        self.account_label = Some(label.into());
        self
    }

    fn section(lines: &mut Vec<String>, heading: &str, entries: &[SummaryEntry]) {
        if entries.is_empty() {
            return;
        }
        lines.push(String::new());
        lines.push(format!("{heading} ({})", entries.len()));
        lines.extend(entries.iter().map(|e| format!("  - {e}")));
    }
}

impl SummaryRenderer for PlainTextRenderer {
    fn subject(&self, summary: &RunSummary) -> String {
        let mut subject = format!(
            "Creative appeals: {} submitted",
            summary.counters.appeals_submitted
        );
        if let Some(label) = &self.account_label {
            subject.push_str(&format!(" for {label}"));
        }
        if summary.mode == RunMode::DryRun {
            subject.push_str(" (dry run)");
        }
        subject
    }

    fn body(&self, summary: &RunSummary) -> String {
        let c = &summary.counters;
        let mut lines = vec![
            format!("Run {} ({})", summary.run_id, summary.mode),
            format!("Started: {}", summary.started_at.to_rfc3339()),
        ];
        if let Some(finished) = summary.finished_at {
            lines.push(format!("Finished: {}", finished.to_rfc3339()));
        }

        if !summary.anomalies.is_empty() {
            lines.push(String::new());
            lines.push(format!("ATTENTION: {} anomalies", summary.anomalies.len()));
            lines.extend(summary.anomalies.iter().map(|a| format!("  - {a}")));
        }

        lines.push(String::new());
        lines.push("Totals".to_string());
        lines.push(format!("  Creatives scanned:      {}", c.creatives_scanned));
        lines.push(format!("  Creatives checked:      {}", c.creatives_checked));
        lines.push(format!("  Without policy topics:  {}", c.creatives_without_topics));
        lines.push(format!("  Topics reviewed:        {}", c.topics_reviewed));
        for (disposition, heading) in SECTIONS {
            lines.push(format!("  {:<22}{}", format!("{heading}:"), c.count(*disposition)));
        }
        lines.push(format!("  Manual review:          {}", c.manual_review));

        if !summary.creative_types.is_empty() {
            lines.push(String::new());
            lines.push("Creative types".to_string());
            lines.extend(
                summary
                    .creative_types
                    .iter()
                    .map(|(t, n)| format!("  {t}: {n}")),
            );
        }

        for (disposition, heading) in SECTIONS {
            Self::section(&mut lines, heading, summary.entries(*disposition));
        }
        Self::section(&mut lines, "Manual review required", &summary.manual_review);
        Self::section(&mut lines, "Skipped (no policy topics)", &summary.skipped_no_topics);

        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RunAggregator;
    use crate::testing::FakeGateway;
    use appeals_core::{Channel, Creative, CreativeId, CreativeType, GroupId, PolicyTopic, PolicyTopicEntry};
    use appeals_store::MemoryStore;

    async fn summary() -> RunSummary {
        let a = Creative::new(
            CreativeId::new("A").unwrap(),
            GroupId::new("G1").unwrap(),
            Channel::Search,
            CreativeType::ResponsiveSearchAd,
        )
        .with_names("Spring Sale", "Shoes")
        .with_topic(PolicyTopicEntry::new(PolicyTopic::new("MISLEADING_CLAIM").unwrap(), true, false));
        let missing = Creative::new(
            CreativeId::new("Z").unwrap(),
            GroupId::new("G9").unwrap(),
            Channel::Video,
            CreativeType::VideoAd,
        )
        .with_topic(PolicyTopicEntry::new(PolicyTopic::new("TRADEMARK").unwrap(), true, false));
        let gateway = FakeGateway::new().with_creative(&a.group_id, &a.id);
        let mut store = MemoryStore::new();
        RunAggregator::new(&mut store, &gateway, "CHANGES_MADE")
            .run(vec![a, missing])
            .await
    }

    #[tokio::test]
    async fn subject_carries_count_and_label() {
        let summary = summary().await;
        let renderer = PlainTextRenderer::new().with_account_label("123-456-7890");
        assert_eq!(
            renderer.subject(&summary),
            "Creative appeals: 1 submitted for 123-456-7890"
        );
    }

    #[tokio::test]
    async fn body_lists_anomalies_before_totals() {
        let body = PlainTextRenderer::new().body(&summary().await);
        let anomalies = body.find("ATTENTION: 1 anomalies").unwrap();
        let totals = body.find("Totals").unwrap();
        assert!(anomalies < totals);
        assert!(body.contains("[LOOKUP_ANOMALY]"));
    }

    #[tokio::test]
    async fn body_has_sections_only_for_non_empty_lists() {
        let body = PlainTextRenderer::new().body(&summary().await);
        assert!(body.contains("Appeals submitted (1)"));
        assert!(body.contains("Appeals failed (1)"));
        assert!(!body.contains("Already appealed ("));
        assert!(body.contains("Campaign: Spring Sale | Group: Shoes | Ad ID: A"));
        assert!(body.contains("RESPONSIVE_SEARCH_AD: 1"));
        assert!(body.contains("VIDEO_AD: 1"));
    }

    #[test]
    fn dry_run_subject_is_marked() {
        let summary = RunSummary::new(RunMode::DryRun);
        assert_eq!(
            PlainTextRenderer::new().subject(&summary),
            "Creative appeals: 0 submitted (dry run)"
        );
    }
}
