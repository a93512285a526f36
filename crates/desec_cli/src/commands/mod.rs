//! CLI command implementations.

pub mod apply;
pub mod dump;

use desec_sync_engine::{DesecProvider, ProviderConfig, ReqwestClient, RetryConfig, SyncError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by CLI commands before or around the sync engine.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No token on the command line or in the environment.
    #[error("API token required (--token or DESEC_TOKEN)")]
    MissingToken,

    /// The plan file could not be read.
    #[error("failed to read plan {path:?}: {source}")]
    ReadPlan {
        /// Plan path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The plan file is not a valid plan.
    #[error("invalid plan {path:?}: {source}")]
    ParsePlan {
        /// Plan path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Unknown output format.
    #[error("unknown format {0:?} (expected text or json)")]
    UnknownFormat(String),

    /// Output could not be rendered.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    /// The sync engine failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Connection settings shared by every command.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// API token.
    pub token: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Retries after a failed request.
    pub max_retries: u32,
    /// Delay before the first retry, in seconds.
    pub initial_backoff_secs: u64,
}

impl ConnectOptions {
    /// Builds the provider configuration.
    pub fn config(&self) -> Result<ProviderConfig, CommandError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(CommandError::MissingToken)?;
        let retry = RetryConfig::new(self.max_retries)
            .with_initial_backoff(Duration::from_secs(self.initial_backoff_secs));
        Ok(ProviderConfig::new("desec", token)
            .with_base_url(self.base_url.as_str())
            .with_retry(retry))
    }

    /// Creates a provider talking to the API over HTTP.
    pub fn connect(&self) -> Result<DesecProvider<ReqwestClient>, CommandError> {
        Ok(DesecProvider::connect(self.config()?)?)
    }
}
