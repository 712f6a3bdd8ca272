//! # Store Subcommand
//!
//! Operator maintenance of the idempotency store. Clearing a record makes
//! the pair eligible for appeal again on the next run; recording one by
//! hand stops a pair from being appealed again after a store write failure.

use std::io::Write;

use anyhow::{Context, Result};
use appeals_core::AppealKey;
use appeals_store::{IdempotencyStore, JsonFileStore};
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::config::RunConfig;

/// Arguments for `appeals store`.
#[derive(Args, Debug)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommand,
}

/// Store subcommands.
#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// List recorded appeals, one `key<TAB>timestamp` per line.
    List,

    /// Delete records so the pairs become eligible again.
    Clear {
        /// Record to delete, as `creativeId::topic`.
        #[arg(long, value_name = "KEY", conflicts_with = "all", required_unless_present = "all")]
        key: Option<String>,
        /// Delete every record.
        #[arg(long)]
        all: bool,
    },

    /// Record a pair as appealed now.
    Record {
        /// Pair to record, as `creativeId::topic`.
        #[arg(long, value_name = "KEY")]
        key: String,
    },
}

/// Execute the store subcommand, writing results to stdout.
pub fn run_store(args: &StoreArgs, config: &RunConfig) -> Result<u8> {
    let mut store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&args.command, &mut store, &mut out)
}

/// Execute one store command against an open store.
pub fn execute(command: &StoreCommand, store: &mut JsonFileStore, out: &mut dyn Write) -> Result<u8> {
    match command {
        StoreCommand::List => cmd_list(store, out),
        StoreCommand::Clear { key: Some(key), .. } => cmd_clear_key(store, key, out),
        StoreCommand::Clear { key: None, .. } => cmd_clear_all(store, out),
        StoreCommand::Record { key } => cmd_record(store, key, out),
    }
}

fn parse_key(raw: &str) -> Result<AppealKey> {
    AppealKey::parse(raw).with_context(|| format!("invalid key {raw:?}; expected creativeId::topic"))
}

fn cmd_list(store: &JsonFileStore, out: &mut dyn Write) -> Result<u8> {
    for (key, at) in store.entries() {
        writeln!(out, "{key}\t{}", at.to_rfc3339())?;
    }
    tracing::info!(records = store.len(), "store listed");
    Ok(0)
}

fn cmd_clear_key(store: &mut JsonFileStore, raw: &str, out: &mut dyn Write) -> Result<u8> {
    let key = parse_key(raw)?;
    match store.remove(&key)? {
        Some(at) => {
            tracing::info!(%key, recorded_at = %at.to_rfc3339(), "record cleared");
            writeln!(out, "OK: cleared {key}")?;
            Ok(0)
        }
        None => {
            writeln!(out, "NOT FOUND: {key}")?;
            Ok(1)
        }
    }
}

fn cmd_clear_all(store: &mut JsonFileStore, out: &mut dyn Write) -> Result<u8> {
    let removed = store.clear()?;
    tracing::info!(removed, "store cleared");
    writeln!(out, "OK: cleared {removed} records")?;
    Ok(0)
}

fn cmd_record(store: &mut JsonFileStore, raw: &str, out: &mut dyn Write) -> Result<u8> {
    let key = parse_key(raw)?;
    store.set(&key, Utc::now())?;
    tracing::info!(%key, "record added by operator");
    writeln!(out, "OK: recorded {key}")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("store.json")).unwrap()
    }

    fn run(command: StoreCommand, store: &mut JsonFileStore) -> (Result<u8>, String) {
        let mut out = Vec::new();
        let code = execute(&command, store, &mut out);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn record_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);

        let (code, out) = run(StoreCommand::Record { key: "A::MISLEADING_CLAIM".into() }, &mut store);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(out, "OK: recorded A::MISLEADING_CLAIM\n");

        let (code, out) = run(StoreCommand::List, &mut store);
        assert_eq!(code.unwrap(), 0);
        assert!(out.starts_with("A::MISLEADING_CLAIM\t"));
    }

    #[test]
    fn record_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        run(StoreCommand::Record { key: "A::X".into() }, &mut store).0.unwrap();
        let (code, _) = run(StoreCommand::Record { key: "A::X".into() }, &mut store);
        assert!(code.is_err());
    }

    #[test]
    fn clear_single_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        run(StoreCommand::Record { key: "A::X".into() }, &mut store).0.unwrap();
        run(StoreCommand::Record { key: "B::Y".into() }, &mut store).0.unwrap();

        let (code, out) = run(StoreCommand::Clear { key: Some("A::X".into()), all: false }, &mut store);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(out, "OK: cleared A::X\n");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_unknown_key_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let (code, out) = run(StoreCommand::Clear { key: Some("Z::Q".into()), all: false }, &mut store);
        assert_eq!(code.unwrap(), 1);
        assert_eq!(out, "NOT FOUND: Z::Q\n");
    }

    #[test]
    fn clear_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        run(StoreCommand::Record { key: "A::X".into() }, &mut store).0.unwrap();
        run(StoreCommand::Record { key: "B::Y".into() }, &mut store).0.unwrap();

        let (code, out) = run(StoreCommand::Clear { key: None, all: true }, &mut store);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(out, "OK: cleared 2 records\n");
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let (code, _) = run(StoreCommand::Record { key: "no-separator".into() }, &mut store);
        let err = code.unwrap_err();
        assert!(err.to_string().contains("creativeId::topic"));
        assert!(store.is_empty());
    }
}
