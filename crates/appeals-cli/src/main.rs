//! # appeals CLI entry point
//!
//! Parses command-line arguments, installs logging and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use appeals_cli::config::RunConfig;
use appeals_cli::run::{run_command, RunArgs, EXIT_FAILURE};
use appeals_cli::store::{run_store, StoreArgs};

/// Creative policy appeals.
///
/// Finds disapproved creatives, appeals each appealable policy topic at most
/// once, and reports what it did.
#[derive(Parser, Debug)]
#[command(name = "appeals", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML configuration file.
    #[arg(long, global = true, env = "APPEALS_CONFIG")]
    config: Option<PathBuf>,

    /// Idempotency store path. Overrides the config file and APPEALS_STORE_PATH.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one appeal audit.
    Run(RunArgs),

    /// Inspect or maintain the idempotency store.
    Store(StoreArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "appeals CLI starting");

    let config = match RunConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_store_path(cli.store),
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    tracing::debug!(store = %config.store_path.display(), "configuration loaded");

    let result = match cli.command {
        Commands::Run(args) => run_command(&args, &config).await,
        Commands::Store(args) => run_store(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
