//! Handles onto the external physics body and scene camera.

use crate::{Pose, Quat, Vec3};

/// Rigid body owned by the external physics engine
///
/// Only yaw rotation is expected to be enabled on the vehicle body.
pub trait PhysicsBody {
    fn translation(&self) -> Vec3;

    fn rotation(&self) -> Quat;

    fn linear_velocity(&self) -> Vec3;

    fn set_linear_velocity(&mut self, velocity: Vec3, wake: bool);

    fn set_angular_velocity(&mut self, velocity: Vec3, wake: bool);

    fn pose(&self) -> Pose {
        Pose::new(self.translation(), self.rotation())
    }
}

/// Scene camera owned by the renderer
pub trait CameraRig {
    fn position(&self) -> Vec3;

    fn orientation(&self) -> Quat;

    fn set_transform(&mut self, position: Vec3, orientation: Quat);
}
