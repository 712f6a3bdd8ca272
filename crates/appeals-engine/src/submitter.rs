//! # Appeal Submitter
//!
//! Performs the appeal for a pair the classifier found eligible:
//!
//! 1. resolve the remote creative by `(group_id, creative_id)`;
//! 2. submit the appeal with the run's justification and the single topic;
//! 3. record `creativeId::topic` in the idempotency store **before**
//!    reporting success.
//!
//! Every failure comes back as a [`SubmissionError`]; nothing here panics or
//! aborts the run. A failed lookup or appeal leaves the store untouched so
//! the pair stays eligible for the next run.

use appeals_core::{AppealGateway, AppealKey, CreativeId, GroupId, PolicyTopic};
use appeals_store::IdempotencyStore;
use chrono::Utc;

use crate::error::SubmissionError;

/// Submits appeals through an [`AppealGateway`].
#[derive(Debug)]
pub struct AppealSubmitter<'g, G> {
    gateway: &'g G,
}

impl<'g, G: AppealGateway> AppealSubmitter<'g, G> {
    /// Create a submitter over `gateway`.
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Appeal `topic` on the creative addressed by `(group_id, creative_id)`.
    pub async fn submit<S>(
        &self,
        store: &mut S,
        creative_id: &CreativeId,
        group_id: &GroupId,
        topic: &PolicyTopic,
        justification: &str,
    ) -> Result<(), SubmissionError>
    where
        S: IdempotencyStore + ?Sized,
    {
        let target = self
            .gateway
            .find_creative(group_id, creative_id)
            .await
            .map_err(|e| SubmissionError::SubmissionFailed(e.to_string()))?
            .ok_or_else(|| SubmissionError::NotFound {
                creative_id: creative_id.clone(),
                group_id: group_id.clone(),
            })?;

        self.gateway
            .appeal(&target, justification, std::slice::from_ref(topic))
            .await
            .map_err(|e| SubmissionError::SubmissionFailed(e.to_string()))?;

        let key = AppealKey::new(creative_id, topic);
        store
            .set(&key, Utc::now())
            .map_err(|source| SubmissionError::StoreWrite { key, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGateway;
    use appeals_store::MemoryStore;

    fn ids() -> (CreativeId, GroupId, PolicyTopic) {
        (
            CreativeId::new("A").unwrap(),
            GroupId::new("G1").unwrap(),
            PolicyTopic::new("MISLEADING_CLAIM").unwrap(),
        )
    }

    #[tokio::test]
    async fn success_records_key_and_sends_single_topic() {
        let (creative, group, topic) = ids();
        let gateway = FakeGateway::new().with_creative(&group, &creative);
        let mut store = MemoryStore::new();

        AppealSubmitter::new(&gateway)
            .submit(&mut store, &creative, &group, &topic, "CHANGES_MADE")
            .await
            .unwrap();

        assert!(store.is_recorded(&AppealKey::parse("A::MISLEADING_CLAIM").unwrap()));
        let calls = gateway.appeals();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].justification, "CHANGES_MADE");
        assert_eq!(calls[0].topics, vec!["MISLEADING_CLAIM".to_string()]);
    }

    #[tokio::test]
    async fn unresolvable_creative_is_not_found() {
        let (creative, group, topic) = ids();
        let gateway = FakeGateway::new();
        let mut store = MemoryStore::new();

        let err = AppealSubmitter::new(&gateway)
            .submit(&mut store, &creative, &group, &topic, "CHANGES_MADE")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::NotFound { .. }));
        assert!(store.is_empty());
        assert!(gateway.appeals().is_empty());
    }

    #[tokio::test]
    async fn platform_rejection_keeps_pair_eligible() {
        let (creative, group, topic) = ids();
        let gateway = FakeGateway::new()
            .with_creative(&group, &creative)
            .rejecting_appeals("INVALID_JUSTIFICATION: text too short");
        let mut store = MemoryStore::new();

        let err = AppealSubmitter::new(&gateway)
            .submit(&mut store, &creative, &group, &topic, "CHANGES_MADE")
            .await
            .unwrap_err();

        match err {
            SubmissionError::SubmissionFailed(msg) => {
                assert_eq!(msg, "INVALID_JUSTIFICATION: text too short")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn lookup_transport_error_is_submission_failure() {
        let (creative, group, topic) = ids();
        let gateway = FakeGateway::new().failing_lookups("connection reset");
        let mut store = MemoryStore::new();

        let err = AppealSubmitter::new(&gateway)
            .submit(&mut store, &creative, &group, &topic, "CHANGES_MADE")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn store_failure_after_remote_success_is_reported() {
        let (creative, group, topic) = ids();
        let gateway = FakeGateway::new().with_creative(&group, &creative);
        let mut store = MemoryStore::new().with_write_failure("read-only filesystem");

        let err = AppealSubmitter::new(&gateway)
            .submit(&mut store, &creative, &group, &topic, "CHANGES_MADE")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::StoreWrite { .. }));
        // The remote appeal did go out.
        assert_eq!(gateway.appeals().len(), 1);
    }
}
