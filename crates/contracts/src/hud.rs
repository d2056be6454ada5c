//! HUD frame and sink trait - display output interface

use serde::{Deserialize, Serialize};

use crate::{ContractError, ControlSignal, Direction, Gear};

/// Display-only snapshot of the driving state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudFrame {
    pub frame_id: u64,

    /// Seconds since the session started
    pub elapsed_s: f64,

    pub speed: f32,
    pub gear: Gear,
    pub direction: Direction,
    pub steering_angle_deg: f32,

    /// Vehicle world position
    pub position: [f32; 3],
}

impl HudFrame {
    pub fn new(
        frame_id: u64,
        elapsed_s: f64,
        speed: f32,
        signal: &ControlSignal,
        position: [f32; 3],
    ) -> Self {
        Self {
            frame_id,
            elapsed_s,
            speed,
            gear: signal.gear,
            direction: signal.direction,
            steering_angle_deg: signal.steering_angle_deg,
            position,
        }
    }

    /// Speed as shown to the driver
    pub fn speed_kmh(&self) -> u32 {
        self.speed.round().max(0.0) as u32
    }

    /// Single-line rendering used by text sinks
    pub fn display_line(&self) -> String {
        format!(
            "{:>3} km/h | {} | {} | steering {:.1}°",
            self.speed_kmh(),
            self.gear.label(),
            self.direction.label(),
            self.steering_angle_deg
        )
    }
}

/// HUD output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(HudSink: Send)]
pub trait LocalHudSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one HUD frame
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, frame: &HudFrame) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
