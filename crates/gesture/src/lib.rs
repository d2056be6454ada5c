//! # Gesture
//!
//! Turns per-frame hand landmarks into a control signal.
//!
//! - Gear: left index raised accelerates, right index raised brakes
//! - Steering: tilt of the line between the two pinch points, folded to
//!   `(-90, 90]` and clamped to the configured limit
//! - Fewer than two hands holds the previous signal
//!
//! ## Usage
//!
//! ```ignore
//! use gesture::GestureStage;
//!
//! let stage = GestureStage::new(blueprint.gesture.clone());
//! let signal_rx = stage.subscribe();
//! let handle = stage.spawn(tracking_rx);
//! // ... signal_rx.borrow() from other tasks ...
//! handle.stop().await;
//! ```

mod gear;
mod interpreter;
mod stage;
mod steering;

pub use gear::{detect_gear, is_index_up};
pub use interpreter::GestureInterpreter;
pub use stage::{GestureStage, GestureStageHandle, GestureStageSummary};
pub use steering::{
    classify_direction, clamp_steering, normalize_angle, pinch_midpoint, raw_steering_angle,
};
