//! Source and sink selection for the `run` subcommand.
//!
//! The engine is generic over the port traits; the binary picks concrete
//! adapters at runtime and wraps the choice in small enums.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use appeals_client::{AdsClient, ClientError, MailRelayClient};
use appeals_core::{Creative, CreativeSource, ReportSink};

// -- Offline source -----------------------------------------------------------

/// Reads creatives from a JSON array on disk (the platform's wire shape).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Failure reading an offline creative file.
#[derive(Debug, thiserror::Error)]
pub enum FileSourceError {
    #[error("failed to read creatives from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse creatives in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CreativeSource for JsonFileSource {
    type Error = FileSourceError;

    async fn fetch_creatives(&self) -> Result<Vec<Creative>, FileSourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FileSourceError::Read {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| FileSourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

// -- Source selection ---------------------------------------------------------

/// Where a run's creatives come from.
#[derive(Debug, Clone)]
pub enum CreativeInput {
    File(JsonFileSource),
    Platform(AdsClient),
}

/// Failure of whichever source was selected.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    File(#[from] FileSourceError),
    #[error(transparent)]
    Platform(#[from] ClientError),
}

impl CreativeSource for CreativeInput {
    type Error = SourceError;

    async fn fetch_creatives(&self) -> Result<Vec<Creative>, SourceError> {
        match self {
            Self::File(source) => Ok(source.fetch_creatives().await?),
            Self::Platform(client) => Ok(client.fetch_creatives().await?),
        }
    }
}

// -- Report sinks -------------------------------------------------------------

/// Writes the report to the log instead of mailing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    type Error = Infallible;

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), Infallible> {
        tracing::info!(%to, %subject, "no mail relay configured; report follows\n{body}");
        Ok(())
    }
}

/// Where the report goes.
#[derive(Debug, Clone)]
pub enum ReportChannel {
    Relay(MailRelayClient),
    Log(LogSink),
}

impl ReportSink for ReportChannel {
    type Error = ClientError;

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ClientError> {
        match self {
            Self::Relay(client) => client.send(to, subject, body).await,
            Self::Log(sink) => match sink.send(to, subject, body).await {
                Ok(()) => Ok(()),
                Err(never) => match never {},
            },
        }
    }
}
