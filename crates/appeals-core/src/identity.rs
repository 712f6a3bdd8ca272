//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for the identifiers the ad platform hands us.
//! Each identifier is a distinct type; you cannot pass a [`GroupId`] where
//! a [`CreativeId`] is expected, and a bare `String` never reaches the
//! idempotency store.
//!
//! ## Validation
//!
//! All three identifiers are opaque strings validated at construction time
//! (and at deserialization time, via `#[serde(try_from = "String")]`):
//!
//! - non-empty after trimming surrounding whitespace;
//! - [`CreativeId`] additionally rejects the `::` key separator so that an
//!   [`AppealKey`](crate::AppealKey) always splits unambiguously.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Separator between the creative id and the policy topic in an idempotency key.
pub const KEY_SEPARATOR: &str = "::";

// ---------------------------------------------------------------------------
// CreativeId
// ---------------------------------------------------------------------------

/// Identifier of a creative (ad), unique within an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreativeId(String);

impl CreativeId {
    /// Create a creative identifier, validating format.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyCreativeId);
        }
        if id.contains(KEY_SEPARATOR) {
            return Err(ValidationError::CreativeIdContainsSeparator(id));
        }
        Ok(Self(id))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CreativeId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CreativeId> for String {
    fn from(id: CreativeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CreativeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// GroupId
// ---------------------------------------------------------------------------

/// Identifier of the ad group a creative belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    /// Create a group identifier, validating that it is non-empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyGroupId);
        }
        Ok(Self(id))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupId> for String {
    fn from(id: GroupId) -> Self {
        id.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PolicyTopic
// ---------------------------------------------------------------------------

/// Name of a policy topic attached to a creative, e.g. `MISLEADING_CLAIM`.
///
/// Unique within one creative's topic list but not globally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PolicyTopic(String);

impl PolicyTopic {
    /// Create a policy topic, validating that it is non-empty.
    pub fn new(topic: impl Into<String>) -> Result<Self, ValidationError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(ValidationError::EmptyPolicyTopic);
        }
        Ok(Self(topic))
    }

    /// Access the topic as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PolicyTopic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PolicyTopic> for String {
    fn from(topic: PolicyTopic) -> Self {
        topic.0
    }
}

impl std::fmt::Display for PolicyTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
