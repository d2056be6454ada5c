//! Frame skip conditions
//!
//! None of these are fatal: the frame loop logs, counts, and moves on to
//! the next frame.

use thiserror::Error;

/// Reason a controller wrote nothing this frame
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FrameSkip {
    /// Physics body not mounted yet
    #[error("physics body not ready")]
    BodyNotReady,

    /// Scene camera not mounted yet
    #[error("camera rig not ready")]
    CameraNotReady,

    /// NaN or infinity in an input or a computed command
    #[error("non-finite {what}")]
    NonFinite { what: &'static str },

    /// Negative or non-finite frame delta
    #[error("invalid frame delta {delta}")]
    InvalidDelta { delta: f32 },
}

impl FrameSkip {
    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            FrameSkip::BodyNotReady => "body_not_ready",
            FrameSkip::CameraNotReady => "camera_not_ready",
            FrameSkip::NonFinite { .. } => "non_finite",
            FrameSkip::InvalidDelta { .. } => "invalid_delta",
        }
    }

    pub(crate) fn non_finite(what: &'static str) -> Self {
        FrameSkip::NonFinite { what }
    }
}

/// Reject deltas that would break interpolation
pub(crate) fn check_delta(delta: f32) -> Result<(), FrameSkip> {
    if delta.is_finite() && delta >= 0.0 {
        Ok(())
    } else {
        Err(FrameSkip::InvalidDelta { delta })
    }
}
