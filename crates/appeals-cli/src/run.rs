//! # Run Subcommand
//!
//! One scheduled appeal run: open the store, fetch creatives, decide and
//! appeal, report.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Run completed; report delivered or suppressed |
//! | 1 | Run aborted (configuration, store or source failure), or the run completed but the summary file or report could not be delivered |
//! | 2 | An appeal was accepted but its store record was not written |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use appeals_client::{AdsApiConfig, AdsClient, MailRelayClient};
use appeals_core::AppealGateway;
use appeals_engine::{
    notify_if_needed, DisabledGateway, PlainTextRenderer, RunAggregator, RunMode, RunSummary,
    SummaryRenderer,
};
use appeals_store::JsonFileStore;
use clap::Args;

use crate::adapters::{CreativeInput, JsonFileSource, LogSink, ReportChannel};
use crate::config::RunConfig;

/// Successful run.
pub const EXIT_OK: u8 = 0;
/// Aborted run, or a completed run whose summary file or report was not delivered.
pub const EXIT_FAILURE: u8 = 1;
/// Appeal accepted remotely but not recorded locally.
pub const EXIT_STORE_WRITE_FAILURE: u8 = 2;

/// Arguments for `appeals run`.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Classify and report without appealing or writing the store.
    #[arg(long)]
    pub dry_run: bool,

    /// Read creatives from a JSON file instead of the ads platform.
    #[arg(long, value_name = "FILE")]
    pub creatives: Option<PathBuf>,

    /// Write the structured run summary as JSON to this path.
    #[arg(long, value_name = "FILE")]
    pub summary_out: Option<PathBuf>,

    /// Never send the report, even when appeals were submitted.
    #[arg(long)]
    pub no_notify: bool,
}

impl RunArgs {
    /// Whether this run talks to the ads platform at all.
    pub fn needs_platform(&self) -> bool {
        !self.dry_run || self.creatives.is_none()
    }

    fn mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Live
        }
    }
}

/// Execute `appeals run`, loading platform settings from the environment.
pub async fn run_command(args: &RunArgs, config: &RunConfig) -> Result<u8> {
    let ads = if args.needs_platform() {
        Some(AdsApiConfig::from_env().context("ads platform configuration")?)
    } else {
        None
    };
    run_appeals(args, config, ads.as_ref()).await
}

/// Execute `appeals run` with explicit platform settings.
///
/// `ads` may be `None` only for a dry run over `--creatives`.
pub async fn run_appeals(args: &RunArgs, config: &RunConfig, ads: Option<&AdsApiConfig>) -> Result<u8> {
    let to = config.notification_email()?;
    let justification = config.appeal_justification()?;

    let client = ads.map(AdsClient::new).transpose().context("building ads platform client")?;
    let source = match (&args.creatives, &client) {
        (Some(path), _) => CreativeInput::File(JsonFileSource::new(path)),
        (None, Some(client)) => CreativeInput::Platform(client.clone()),
        (None, None) => anyhow::bail!("no creative source: pass --creatives or configure ADS_API_URL"),
    };

    let mut store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    tracing::info!(
        store = %store.path().display(),
        recorded = store.len(),
        mode = %args.mode(),
        "store opened"
    );

    let summary = match (args.mode(), &client) {
        (RunMode::Live, Some(client)) => execute(&mut store, client, justification, args.mode(), &source).await?,
        (RunMode::Live, None) => anyhow::bail!("live runs require ads platform configuration"),
        (RunMode::DryRun, _) => {
            execute(&mut store, &DisabledGateway, justification, args.mode(), &source).await?
        }
    };
    drop(store);

    let mut renderer = PlainTextRenderer::new();
    if let Some(ads) = ads {
        renderer = renderer.with_account_label(ads.account_id.clone());
    }
    println!("{}", renderer.body(&summary));

    // Appeals may already be out; nothing below may skip the report or the
    // store-write check.
    let mut code = EXIT_OK;
    if let Some(path) = &args.summary_out {
        if let Err(e) = write_summary(path, &summary) {
            tracing::error!(run_id = %summary.run_id, "{e:#}");
            code = EXIT_FAILURE;
        }
    }

    if !args.no_notify {
        let channel = report_channel(ads)?;
        if let Err(e) = notify_if_needed(&channel, &renderer, to, &summary).await {
            tracing::error!(error = %e, "report delivery failed");
            code = EXIT_FAILURE;
        }
    }

    if summary.has_store_write_failures() {
        tracing::error!(
            run_id = %summary.run_id,
            "appeals were submitted without being recorded; record them with `appeals store record --key`"
        );
        code = EXIT_STORE_WRITE_FAILURE;
    }
    Ok(code)
}

async fn execute<G: AppealGateway>(
    store: &mut JsonFileStore,
    gateway: &G,
    justification: &str,
    mode: RunMode,
    source: &CreativeInput,
) -> Result<RunSummary> {
    let summary = RunAggregator::new(store, gateway, justification)
        .with_mode(mode)
        .run_source(source)
        .await?;
    Ok(summary)
}

fn report_channel(ads: Option<&AdsApiConfig>) -> Result<ReportChannel> {
    match ads.and_then(|a| a.mail_relay_url.clone().map(|url| (url, a.timeout_secs))) {
        Some((url, timeout_secs)) => Ok(ReportChannel::Relay(
            MailRelayClient::new(url, timeout_secs).context("building mail relay client")?,
        )),
        None => Ok(ReportChannel::Log(LogSink)),
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing run summary")?;
    std::fs::write(path, json).with_context(|| format!("writing run summary {}", path.display()))?;
    tracing::info!(path = %path.display(), "run summary written");
    Ok(())
}
