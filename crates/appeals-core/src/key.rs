//! # Idempotency Keys
//!
//! An [`AppealKey`] names one (creative, policy topic) pair. Its string form
//! `creativeId::topic` is what the idempotency store persists, so the format
//! is a compatibility surface: changing it would make every previously
//! recorded appeal look fresh.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{CreativeId, PolicyTopic, KEY_SEPARATOR};

/// Composite idempotency key for one (creative, policy topic) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppealKey {
    creative_id: CreativeId,
    topic: PolicyTopic,
}

impl AppealKey {
    /// Build the key for a creative and one of its topics.
    pub fn new(creative_id: &CreativeId, topic: &PolicyTopic) -> Self {
        Self {
            creative_id: creative_id.clone(),
            topic: topic.clone(),
        }
    }

    /// Parse a key from its `creativeId::topic` string form.
    ///
    /// Splits at the first separator; creative ids never contain one, topics may.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let (creative, topic) = raw
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| ValidationError::MalformedAppealKey(raw.to_string()))?;
        let creative_id = CreativeId::new(creative)
            .map_err(|_| ValidationError::MalformedAppealKey(raw.to_string()))?;
        let topic = PolicyTopic::new(topic)
            .map_err(|_| ValidationError::MalformedAppealKey(raw.to_string()))?;
        Ok(Self { creative_id, topic })
    }

    /// The creative half of the key.
    pub fn creative_id(&self) -> &CreativeId {
        &self.creative_id
    }

    /// The topic half of the key.
    pub fn topic(&self) -> &PolicyTopic {
        &self.topic
    }
}

impl std::fmt::Display for AppealKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.creative_id, KEY_SEPARATOR, self.topic)
    }
}

impl std::str::FromStr for AppealKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AppealKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AppealKey> for String {
    fn from(key: AppealKey) -> Self {
        key.to_string()
    }
}
