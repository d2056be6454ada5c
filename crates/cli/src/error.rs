//! Error types for CLI operations.

use contracts::ContractError;
use hud::HudError;
use ingestion::IngestionError;
use thiserror::Error;

/// Session setup and teardown failures
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ContractError),

    #[error("Tracking input error: {0}")]
    Intake(#[from] IngestionError),

    #[error("HUD setup failed: {0}")]
    Hud(#[from] HudError),

    #[error("Error during shutdown: {message}")]
    Shutdown { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn shutdown(message: impl Into<String>) -> Self {
        Self::Shutdown {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
