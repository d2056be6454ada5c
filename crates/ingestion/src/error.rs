//! Ingestion error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Recording could not be opened or read
    #[error("failed to load recording {path}: {message}")]
    ReplayLoad {
        path: PathBuf,
        message: String,
    },

    /// Recording line is not a valid hand set
    #[error("invalid recording line {line}: {message}")]
    ReplayParse {
        line: usize,
        message: String,
    },

    /// Unknown mock script name
    #[error("unknown mock script '{name}' (expected one of: lap, straight, brake-test, signal-loss)")]
    UnknownScript {
        name: String,
    },

    /// Source id registered twice
    #[error("hand source {source_id} is already registered")]
    AlreadyRegistered {
        source_id: String,
    },

    /// Channel closed
    #[error("channel closed for source {source_id}")]
    ChannelClosed {
        source_id: String,
    },

    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl IngestionError {
    pub fn replay_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ReplayLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn replay_parse(line: usize, message: impl Into<String>) -> Self {
        Self::ReplayParse {
            line,
            message: message.into(),
        }
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
