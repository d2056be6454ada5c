//! Control signal produced by the gesture interpreter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Throttle intent derived from index-finger posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gear {
    #[default]
    Idle,
    Accelerate,
    Brake,
}

impl Gear {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gear::Idle => "idle",
            Gear::Accelerate => "accelerate",
            Gear::Brake => "brake",
        }
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            Gear::Idle => "Idle",
            Gear::Accelerate => "ACCELERATE",
            Gear::Brake => "BRAKE",
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steering classification; positive angles steer left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Straight,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Straight => "straight",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Straight => "Straight",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest interpreted gesture; no smoothing at this layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSignal {
    pub gear: Gear,

    /// Degrees, clamped to the configured steering limit
    pub steering_angle_deg: f32,

    pub direction: Direction,
}

impl ControlSignal {
    pub const IDLE: ControlSignal = ControlSignal {
        gear: Gear::Idle,
        steering_angle_deg: 0.0,
        direction: Direction::Straight,
    };
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.1}°",
            self.gear.label(),
            self.direction.label(),
            self.steering_angle_deg
        )
    }
}

/// Per-frame input to the motion controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveInput {
    pub speed: f32,
    pub steering_angle_deg: f32,
}
