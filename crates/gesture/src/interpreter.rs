//! Gesture interpreter: hand set in, control signal out.

use contracts::{ControlSignal, GestureConfig, HandSet};
use tracing::{instrument, trace};

use crate::gear::detect_gear;
use crate::steering::{
    classify_direction, clamp_steering, normalize_angle, pinch_midpoint, raw_steering_angle,
};

/// Stateless interpretation plus the latest published signal
///
/// When a frame does not carry both hands the previous signal is held,
/// so the car coasts on tracking loss instead of dropping to idle.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: GestureConfig,
    latest: ControlSignal,
    held_frames: u64,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            latest: ControlSignal::IDLE,
            held_frames: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Interpret one hand set
    ///
    /// Returns `None` when fewer than two hands are present or the
    /// landmarks produce a non-finite angle.
    pub fn interpret(&self, hands: &HandSet) -> Option<ControlSignal> {
        let (left, right) = hands.pair()?;

        let gear = detect_gear(left, right, self.config.finger_up_margin);

        let raw = raw_steering_angle(pinch_midpoint(left), pinch_midpoint(right));
        if !raw.is_finite() {
            return None;
        }
        let steering_angle_deg =
            clamp_steering(normalize_angle(raw), self.config.steering_limit_deg);
        let direction = classify_direction(steering_angle_deg, self.config.direction_threshold_deg);

        Some(ControlSignal {
            gear,
            steering_angle_deg,
            direction,
        })
    }

    /// Interpret and update the latest signal, holding it on a miss
    #[instrument(
        level = "trace",
        name = "gesture_apply",
        skip(self, hands),
        fields(hands = hands.len(), frame_id = ?hands.frame_id)
    )]
    pub fn apply(&mut self, hands: &HandSet) -> &ControlSignal {
        match self.interpret(hands) {
            Some(signal) => self.latest = signal,
            None => {
                self.held_frames += 1;
                trace!(held_frames = self.held_frames, "holding previous signal");
            }
        }
        &self.latest
    }

    pub fn latest(&self) -> &ControlSignal {
        &self.latest
    }

    /// Frames that did not produce a fresh signal
    pub fn held_frames(&self) -> u64 {
        self.held_frames
    }
}
