//! # Run Configuration
//!
//! Settings for the `appeals` binary, merged from an optional YAML file and
//! the environment (environment wins):
//!
//! | YAML key | Variable | Required |
//! |----------|----------|----------|
//! | `notification_email` | `NOTIFICATION_EMAIL` | for `run` |
//! | `appeal_justification` | `APPEAL_JUSTIFICATION` | for `run` |
//! | `store_path` | `APPEALS_STORE_PATH` | no (default `appeals-store.json`) |
//!
//! Ads platform credentials are not part of this file; they come from the
//! environment only (see `appeals_client::AdsApiConfig`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Store location used when nothing else is configured.
pub const DEFAULT_STORE_PATH: &str = "appeals-store.json";

/// Contents of the YAML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub notification_email: Option<String>,
    #[serde(default)]
    pub appeal_justification: Option<String>,
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl FileConfig {
    /// Parse the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Merged settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    notification_email: Option<String>,
    appeal_justification: Option<String>,
    pub store_path: PathBuf,
}

impl RunConfig {
    /// Load the optional file at `path` and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(file, |var| std::env::var(var).ok()))
    }

    /// Merge file settings with a variable lookup. Blank values are ignored.
    pub fn merge<F>(file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &str, fallback: Option<String>| {
            lookup(var)
                .or(fallback)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            notification_email: pick("NOTIFICATION_EMAIL", file.notification_email),
            appeal_justification: pick("APPEAL_JUSTIFICATION", file.appeal_justification),
            store_path: pick(
                "APPEALS_STORE_PATH",
                file.store_path.map(|p| p.to_string_lossy().into_owned()),
            )
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
        }
    }

    /// Replace the store path (the global `--store` flag).
    pub fn with_store_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.store_path = path;
        }
        self
    }

    /// Report destination.
    pub fn notification_email(&self) -> Result<&str, ConfigError> {
        self.notification_email
            .as_deref()
            .ok_or(ConfigError::Missing("NOTIFICATION_EMAIL"))
    }

    /// Justification sent with every appeal.
    pub fn appeal_justification(&self) -> Result<&str, ConfigError> {
        self.appeal_justification
            .as_deref()
            .ok_or(ConfigError::Missing("APPEAL_JUSTIFICATION"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required (set the variable or add it to the config file)")]
    Missing(&'static str),
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
