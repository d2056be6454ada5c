//! # Contracts
//!
//! Frozen interface contracts shared by every stage of the gesture racer
//! control core. Business crates depend only on this crate; reverse
//! dependencies are prohibited.
//!
//! ## Coordinate Model
//! - Landmarks are normalized image coordinates: `x` grows to the right,
//!   `y` grows downward, both in `[0, 1]`
//! - World space is right-handed, +Y up, vehicle forward is local −Z
//! - Timestamps are seconds (f64) since the tracking source started

mod blueprint;
mod control;
mod error;
mod hand_source;
mod hud;
mod landmark;
mod physics;
mod pose;

pub use blueprint::*;
pub use control::*;
pub use error::*;
pub use hand_source::{HandSetCallback, HandSource};
pub use hud::*;
pub use landmark::*;
pub use physics::{CameraRig, PhysicsBody};
pub use pose::*;
