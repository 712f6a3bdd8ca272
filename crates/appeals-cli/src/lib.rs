//! # appeals-cli -- Command-Line Interface for Creative Policy Appeals
//!
//! Provides the `appeals` binary, meant to be run on a schedule.
//!
//! ## Subcommands
//!
//! - `appeals run` performs one audit: list creatives, appeal what is
//!   eligible, report. `--dry-run` only plans.
//! - `appeals store list|clear|record` maintains the idempotency store.
//!
//! ```bash
//! appeals run
//! appeals run --dry-run --creatives export.json --summary-out summary.json
//! appeals store clear --key 123456::MISLEADING_CLAIM
//! ```
//!
//! Only one process may use a store at a time; a second one fails to open
//! it while the first holds the lock.

pub mod adapters;
pub mod config;
pub mod run;
pub mod store;
