//! World-space math aliases and rigid poses.

use nalgebra::{UnitQuaternion, Vector3};

/// World-space vector, meters or meters/second
pub type Vec3 = Vector3<f32>;

/// World-space rotation
pub type Quat = UnitQuaternion<f32>;

/// Vehicle local forward axis
#[inline]
pub fn forward_axis() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// World up axis
#[inline]
pub fn up_axis() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Position and orientation of a rigid body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::identity())
    }

    /// World direction the pose is facing
    pub fn forward(&self) -> Vec3 {
        self.orientation * forward_axis()
    }

    pub fn is_finite(&self) -> bool {
        vec_is_finite(&self.position) && quat_is_finite(&self.orientation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

pub fn vec_is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

pub fn quat_is_finite(q: &Quat) -> bool {
    q.coords.iter().all(|c| c.is_finite())
}

/// Convert a `[x, y, z]` config triple
pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}
