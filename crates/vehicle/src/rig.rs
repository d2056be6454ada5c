//! Headless camera rig.

use contracts::{CameraRig, Quat, Vec3};

/// Camera transform holder standing in for a renderer camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    position: Vec3,
    orientation: Quat,
    writes: u64,
}

impl SceneCamera {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            writes: 0,
        }
    }

    /// Transforms applied so far
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }
}

impl CameraRig for SceneCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_transform(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
        self.writes += 1;
    }
}
