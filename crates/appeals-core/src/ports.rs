//! # Collaborator Ports
//!
//! Narrow interfaces to everything outside the decision engine: where
//! creatives come from, how an appeal reaches the platform, and where the
//! run report goes. The engine is generic over these traits; concrete HTTP
//! adapters live in `appeals-client`, in-memory fakes live next to the tests.
//!
//! Methods return `impl Future` so adapters may perform network I/O. The
//! engine awaits them strictly one at a time; nothing here implies
//! parallelism.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::creative::Creative;
use crate::identity::{CreativeId, GroupId, PolicyTopic};

/// Produces the creatives to audit for one run.
///
/// The sequence is finite, restartable per run (a fresh call starts over)
/// and pre-filtered to enabled campaigns, groups and creatives across the
/// five supported channels. A failure here is the only run-fatal condition.
pub trait CreativeSource {
    /// Source failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every creative for this run, in platform order.
    fn fetch_creatives(&self) -> impl Future<Output = Result<Vec<Creative>, Self::Error>>;
}

/// A remote creative resolved for appeal submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealTarget {
    /// Ad group of the resolved creative.
    pub group_id: GroupId,
    /// The resolved creative.
    pub creative_id: CreativeId,
    /// Platform resource name, echoed back on the appeal action. Empty when
    /// the lookup returned none.
    #[serde(default)]
    pub resource_name: String,
}

/// The platform's creative lookup and appeal action.
pub trait AppealGateway {
    /// Transport or validation error; only its message is ever inspected.
    type Error: std::fmt::Display;

    /// Resolve the exact remote creative addressed by `(group_id, creative_id)`.
    ///
    /// `Ok(None)` means the platform no longer knows the creative.
    fn find_creative(
        &self,
        group_id: &GroupId,
        creative_id: &CreativeId,
    ) -> impl Future<Output = Result<Option<AppealTarget>, Self::Error>>;

    /// Submit an appeal for `topics` on a resolved creative.
    fn appeal(
        &self,
        target: &AppealTarget,
        justification: &str,
        topics: &[PolicyTopic],
    ) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Delivers a rendered run report to a human.
pub trait ReportSink {
    /// Delivery failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `body` with `subject` to the address `to`.
    fn send(&self, to: &str, subject: &str, body: &str) -> impl Future<Output = Result<(), Self::Error>>;
}
