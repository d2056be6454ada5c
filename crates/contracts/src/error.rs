//! Layered error definitions
//!
//! Categorized by source: config / tracking / hud

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Tracking Errors =====
    /// Hand tracker could not be loaded or started
    #[error("hand tracker '{source_id}' unavailable: {message}")]
    TrackerUnavailable { source_id: String, message: String },

    /// Hand set violates the 0..=2 distinct-handedness rule
    #[error("invalid hand set: {message}")]
    InvalidHandSet { message: String },

    /// Recorded tracking frame could not be decoded
    #[error("tracking frame parse error for '{source_id}': {message}")]
    FrameParse { source_id: String, message: String },

    // ===== HUD Errors =====
    /// HUD sink write error
    #[error("hud sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    /// HUD sink connection error
    #[error("hud sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create tracker unavailable error
    pub fn tracker_unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TrackerUnavailable {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create invalid hand set error
    pub fn invalid_hand_set(message: impl Into<String>) -> Self {
        Self::InvalidHandSet {
            message: message.into(),
        }
    }

    /// Create frame parse error
    pub fn frame_parse(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FrameParse {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
