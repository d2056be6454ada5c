//! Vehicle motion controller.
//!
//! Converts `(speed, steering)` into velocity commands on the physics
//! body once per rendered frame. Linear velocity eases toward the target
//! along the body's forward axis; yaw rate follows steering directly.

use contracts::{
    forward_axis, quat_is_finite, vec_is_finite, DriveInput, MotionConfig, PhysicsBody, Vec3,
};
use tracing::trace;

use crate::error::{check_delta, FrameSkip};
use crate::smoothing::smoothing_factor;

/// Velocities written to the body this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    pub linear: Vec3,
    pub angular: Vec3,
}

#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    smoothed: Vec3,
    frames: u64,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            smoothed: Vec3::zeros(),
            frames: 0,
        }
    }

    /// Smoothed velocity accumulator
    pub fn smoothed_velocity(&self) -> Vec3 {
        self.smoothed
    }

    /// Frames that produced a command
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Compute and apply this frame's velocity commands
    ///
    /// # Errors
    /// A `FrameSkip` when the body is absent or any input or result is
    /// not finite. Nothing is written to the body and the accumulator is
    /// left untouched in that case.
    pub fn update<B>(
        &mut self,
        body: Option<&mut B>,
        input: DriveInput,
        delta: f32,
    ) -> Result<MotionCommand, FrameSkip>
    where
        B: PhysicsBody + ?Sized,
    {
        let body = body.ok_or(FrameSkip::BodyNotReady)?;
        check_delta(delta)?;
        if !input.speed.is_finite() || !input.steering_angle_deg.is_finite() {
            return Err(FrameSkip::non_finite("drive input"));
        }

        let rotation = body.rotation();
        if !quat_is_finite(&rotation) {
            return Err(FrameSkip::non_finite("body rotation"));
        }
        let current = body.linear_velocity();
        if !vec_is_finite(&current) {
            return Err(FrameSkip::non_finite("body velocity"));
        }

        let forward = rotation * forward_axis();
        let target = forward * (input.speed / self.config.speed_divisor);
        let t = smoothing_factor(self.config.smoothing, self.config.smoothing_rate, delta);
        let smoothed = self.smoothed.lerp(&target, t);

        let linear = Vec3::new(smoothed.x, current.y, smoothed.z);
        let angular = Vec3::new(0.0, input.steering_angle_deg / self.config.turn_divisor, 0.0);
        if !vec_is_finite(&linear) || !vec_is_finite(&angular) {
            return Err(FrameSkip::non_finite("motion command"));
        }

        self.smoothed = smoothed;
        self.frames += 1;
        body.set_linear_velocity(linear, true);
        body.set_angular_velocity(angular, true);

        trace!(
            speed = input.speed,
            steering = input.steering_angle_deg,
            vx = linear.x,
            vz = linear.z,
            yaw_rate = angular.y,
            "motion command"
        );

        Ok(MotionCommand { linear, angular })
    }
}
