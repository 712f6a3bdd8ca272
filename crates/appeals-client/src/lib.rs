//! # appeals-client -- HTTP adapters for creative policy appeals
//!
//! Implements the `appeals_core::ports` traits against remote services:
//!
//! - [`AdsClient`] is both the [`CreativeSource`](appeals_core::CreativeSource)
//!   (paginated listing of enabled creatives) and the
//!   [`AppealGateway`](appeals_core::AppealGateway) (creative lookup and
//!   appeal action).
//! - [`MailRelayClient`] is the [`ReportSink`](appeals_core::ReportSink).
//!
//! ## Architecture
//!
//! This crate is the only place that speaks HTTP. The engine sees nothing
//! but the port traits, so tests swap these clients for in-memory fakes.

pub mod ads;
pub mod config;
pub mod error;
pub mod mail;
pub(crate) mod retry;

pub use ads::AdsClient;
pub use config::{AdsApiConfig, ConfigError};
pub use error::ClientError;
pub use mail::MailRelayClient;
