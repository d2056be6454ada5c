//! RacerBlueprint - Config Loader output
//!
//! Describes one complete driving session: hand tracking input, gesture
//! thresholds, drivetrain rates, motion and camera tuning, the vehicle
//! body, and HUD output routing. Every section has defaults, so an empty
//! document is a valid blueprint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use validator::Validate;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete session blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RacerBlueprint {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    #[validate(nested)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    #[validate(nested)]
    pub gesture: GestureConfig,

    #[serde(default)]
    #[validate(nested)]
    pub drivetrain: DrivetrainConfig,

    #[serde(default)]
    #[validate(nested)]
    pub motion: MotionConfig,

    #[serde(default)]
    #[validate(nested)]
    pub camera: CameraConfig,

    #[serde(default)]
    #[validate(nested)]
    pub body: BodyConfig,

    #[serde(default)]
    #[validate(nested)]
    pub session: SessionConfig,

    /// HUD output routing
    #[serde(default)]
    #[validate(nested)]
    pub hud: Vec<HudSinkConfig>,
}

/// Hand tracker options and intake channel sizing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TrackingConfig {
    pub source_id: String,

    /// Camera frame rate fed to the tracker
    #[validate(range(exclusive_min = 0.0, max = 240.0))]
    pub frequency_hz: f64,

    #[validate(range(min = 2, max = 2, message = "steering needs exactly two hands"))]
    pub max_hands: u8,

    #[validate(range(min = 0.0, max = 1.0))]
    pub min_detection_confidence: f32,

    #[validate(range(min = 0.0, max = 1.0))]
    pub min_tracking_confidence: f32,

    #[validate(range(min = 0, max = 2))]
    pub model_complexity: u8,

    #[validate(range(min = 1))]
    pub width: u32,

    #[validate(range(min = 1))]
    pub height: u32,

    #[validate(range(min = 1))]
    pub channel_capacity: usize,

    pub drop_policy: DropPolicy,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            source_id: "webcam".to_string(),
            frequency_hz: 30.0,
            max_hands: 2,
            min_detection_confidence: 0.8,
            min_tracking_confidence: 0.8,
            model_complexity: 1,
            width: 640,
            height: 480,
            channel_capacity: 16,
            drop_policy: DropPolicy::DropNewest,
        }
    }
}

/// Drop policy when the intake channel is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// Drop the oldest queued hand set
    DropOldest,
    /// Drop the incoming hand set
    #[default]
    DropNewest,
}

/// Gesture interpretation thresholds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GestureConfig {
    /// Index tip must sit this far above its knuckle (normalized units)
    #[validate(range(min = 0.0, max = 0.5))]
    pub finger_up_margin: f32,

    /// Symmetric steering bound in degrees
    #[validate(range(exclusive_min = 0.0, max = 90.0))]
    pub steering_limit_deg: f32,

    /// Dead zone for direction classification in degrees
    #[validate(range(min = 0.0, max = 90.0))]
    pub direction_threshold_deg: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            finger_up_margin: 0.05,
            steering_limit_deg: 30.0,
            direction_threshold_deg: 10.0,
        }
    }
}

/// Speed integrator rates, applied once per tick
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DrivetrainConfig {
    #[validate(range(min = 1, max = 1000))]
    pub tick_ms: u64,

    #[validate(range(exclusive_min = 0.0))]
    pub max_speed: f32,

    #[validate(range(min = 0.0))]
    pub accel_rate: f32,

    #[validate(range(min = 0.0))]
    pub brake_rate: f32,

    #[validate(range(min = 0.0))]
    pub coast_rate: f32,
}

impl DrivetrainConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            max_speed: 200.0,
            accel_rate: 2.0,
            brake_rate: 5.0,
            coast_rate: 1.0,
        }
    }
}

/// Interpolation factor curve for per-frame smoothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingCurve {
    /// `1 - exp(-rate * delta)`, frame-rate independent
    #[default]
    Exponential,
    /// `clamp(rate * delta, 0, 1)`
    Linear,
}

/// Vehicle motion controller tuning
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MotionConfig {
    /// speed / divisor = target linear speed (m/s)
    #[validate(range(exclusive_min = 0.0))]
    pub speed_divisor: f32,

    /// steering degrees / divisor = yaw rate (rad/s)
    #[validate(range(exclusive_min = 0.0))]
    pub turn_divisor: f32,

    #[validate(range(min = 0.0))]
    pub smoothing_rate: f32,

    pub smoothing: SmoothingCurve,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_divisor: 20.0,
            turn_divisor: 40.0,
            smoothing_rate: 2.5,
            smoothing: SmoothingCurve::Exponential,
        }
    }
}

/// Chase camera tuning
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset in the vehicle frame: up, then behind (+Z is behind)
    pub offset: [f32; 3],

    #[validate(range(min = 0.0))]
    pub position_rate: f32,

    #[validate(range(min = 0.0))]
    pub target_rate: f32,

    #[validate(range(min = 0.0))]
    pub orientation_rate: f32,

    pub smoothing: SmoothingCurve,

    pub initial_position: [f32; 3],

    pub initial_target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 3.5, 12.0],
            position_rate: 3.0,
            target_rate: 5.0,
            orientation_rate: 4.0,
            smoothing: SmoothingCurve::Exponential,
            initial_position: [10.0, 15.0, 70.0],
            initial_target: [10.0, 12.5, 60.0],
        }
    }
}

/// Vehicle rigid body description handed to the physics engine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BodyConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub mass: f32,

    #[validate(range(min = 0.0))]
    pub linear_damping: f32,

    #[validate(range(min = 0.0))]
    pub angular_damping: f32,

    #[validate(range(min = 0.0))]
    pub friction: f32,

    /// Rotation locks as `[x, y, z]`
    pub enabled_rotations: [bool; 3],

    pub spawn_position: [f32; 3],

    pub spawn_yaw_deg: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            linear_damping: 2.5,
            angular_damping: 2.0,
            friction: 0.7,
            enabled_rotations: [false, true, false],
            spawn_position: [10.0, 12.5, 60.0],
            spawn_yaw_deg: 0.0,
        }
    }
}

/// Frame loop pacing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SessionConfig {
    /// Render frames per second
    #[validate(range(exclusive_min = 0.0, max = 240.0))]
    pub fps: f64,

    /// HUD publish period
    #[validate(range(min = 1))]
    pub hud_interval_ms: u64,
}

impl SessionConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    pub fn hud_interval(&self) -> Duration {
        Duration::from_millis(self.hud_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            hud_interval_ms: 100,
        }
    }
}

/// HUD sink output config
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HudSinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: HudSinkType,

    /// Queue capacity
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1))]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    64
}

/// HUD sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HudSinkType {
    /// tracing output
    Log,
    /// JSON lines file
    File,
    /// UDP datagrams
    Network,
}
