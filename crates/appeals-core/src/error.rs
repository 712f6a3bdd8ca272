//! # Error Hierarchy
//!
//! Validation errors for the domain primitives in this crate, built with
//! `thiserror`. Each variant carries the rejected input so that operators
//! can trace a malformed record back to the platform export that produced it.

use thiserror::Error;

/// Validation errors for identifier newtypes and idempotency keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Creative identifier is empty or whitespace.
    #[error("invalid creative ID: must be non-empty")]
    EmptyCreativeId,

    /// Creative identifier contains the key separator.
    #[error("invalid creative ID: \"{0}\" (must not contain \"::\")")]
    CreativeIdContainsSeparator(String),

    /// Group identifier is empty or whitespace.
    #[error("invalid group ID: must be non-empty")]
    EmptyGroupId,

    /// Policy topic is empty or whitespace.
    #[error("invalid policy topic: must be non-empty")]
    EmptyPolicyTopic,

    /// Idempotency key does not have the `creativeId::topic` shape.
    #[error("invalid appeal key: \"{0}\" (expected <creativeId>::<topic>)")]
    MalformedAppealKey(String),
}
