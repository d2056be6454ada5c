//! # Vehicle
//!
//! Per-frame controllers that sit between the control signal and the
//! external engine:
//!
//! - [`MotionController`]: `(speed, steering)` to smoothed linear velocity
//!   and yaw rate on the physics body
//! - [`ChaseCamera`]: vehicle pose to an eased follow camera transform
//!
//! Both write nothing and return a [`FrameSkip`] when their target is not
//! mounted or the numbers are not finite.
//!
//! [`KinematicBody`] and [`SceneCamera`] are headless stand-ins for the
//! engine handles; [`DriveRig`] runs one frame over both.

mod body;
mod camera;
mod drive;
mod error;
mod motion;
mod rig;
mod smoothing;

pub use body::KinematicBody;
pub use camera::{look_rotation, CameraState, ChaseCamera};
pub use drive::{DriveRig, FrameReport};
pub use error::FrameSkip;
pub use motion::{MotionCommand, MotionController};
pub use rig::SceneCamera;
pub use smoothing::smoothing_factor;
