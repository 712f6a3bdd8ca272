//! In-memory collaborators for engine unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use appeals_core::{AppealGateway, AppealTarget, CreativeId, GroupId, PolicyTopic, ReportSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeError(pub String);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FakeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppealCall {
    pub group_id: String,
    pub creative_id: String,
    pub justification: String,
    pub topics: Vec<String>,
}

/// Gateway that knows a fixed set of creatives and records every appeal.
#[derive(Debug, Default)]
pub struct FakeGateway {
    known: BTreeSet<(String, String)>,
    rejections: BTreeMap<String, String>,
    reject_all: Option<String>,
    lookup_failure: Option<String>,
    lookups: RefCell<u32>,
    appeals: RefCell<Vec<AppealCall>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_creative(mut self, group: &GroupId, creative: &CreativeId) -> Self {
        self.known.insert((group.to_string(), creative.to_string()));
        self
    }

    pub fn rejecting_appeals(mut self, message: &str) -> Self {
        self.reject_all = Some(message.to_string());
        self
    }

    pub fn rejecting_creative(mut self, creative: &str, message: &str) -> Self {
        self.rejections.insert(creative.to_string(), message.to_string());
        self
    }

    pub fn failing_lookups(mut self, message: &str) -> Self {
        self.lookup_failure = Some(message.to_string());
        self
    }

    pub fn lookups(&self) -> u32 {
        *self.lookups.borrow()
    }

    pub fn appeals(&self) -> Vec<AppealCall> {
        self.appeals.borrow().clone()
    }
}

impl AppealGateway for FakeGateway {
    type Error = FakeError;

    async fn find_creative(
        &self,
        group_id: &GroupId,
        creative_id: &CreativeId,
    ) -> Result<Option<AppealTarget>, FakeError> {
        *self.lookups.borrow_mut() += 1;
        if let Some(message) = &self.lookup_failure {
            return Err(FakeError(message.clone()));
        }
        let known = self
            .known
            .contains(&(group_id.to_string(), creative_id.to_string()));
        Ok(known.then(|| AppealTarget {
            group_id: group_id.clone(),
            creative_id: creative_id.clone(),
            resource_name: format!("groups/{group_id}/creatives/{creative_id}"),
        }))
    }

    async fn appeal(
        &self,
        target: &AppealTarget,
        justification: &str,
        topics: &[PolicyTopic],
    ) -> Result<(), FakeError> {
        self.appeals.borrow_mut().push(AppealCall {
            group_id: target.group_id.to_string(),
            creative_id: target.creative_id.to_string(),
            justification: justification.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        });
        if let Some(message) = self.rejections.get(target.creative_id.as_str()) {
            return Err(FakeError(message.clone()));
        }
        if let Some(message) = &self.reject_all {
            return Err(FakeError(message.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sink that keeps every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingSink {
    failure: Option<String>,
    sent: RefCell<Vec<SentMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.borrow().clone()
    }
}

impl ReportSink for RecordingSink {
    type Error = FakeError;

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), FakeError> {
        if let Some(message) = &self.failure {
            return Err(FakeError(message.clone()));
        }
        self.sent.borrow_mut().push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
