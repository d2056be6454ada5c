//! Per-frame drive step over a headless body and camera.

use contracts::{DriveInput, PhysicsBody, Pose, RacerBlueprint, Vec3};
use tracing::debug;

use crate::body::KinematicBody;
use crate::camera::{CameraState, ChaseCamera};
use crate::error::FrameSkip;
use crate::motion::{MotionCommand, MotionController};
use crate::rig::SceneCamera;

/// Outcome of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub command: MotionCommand,
    pub pose: Pose,
    /// `None` when the camera skipped this frame
    pub camera: Option<CameraState>,
}

/// Motion and camera controllers plus the handles they drive
///
/// Either handle may be absent, e.g. before the scene has mounted.
#[derive(Debug)]
pub struct DriveRig {
    motion: MotionController,
    camera: ChaseCamera,
    body: Option<KinematicBody>,
    scene_camera: Option<SceneCamera>,
}

impl DriveRig {
    /// Controllers only, nothing mounted
    pub fn new(blueprint: &RacerBlueprint) -> Self {
        Self {
            motion: MotionController::new(blueprint.motion.clone()),
            camera: ChaseCamera::new(blueprint.camera.clone()),
            body: None,
            scene_camera: None,
        }
    }

    /// Body at its spawn pose and a camera at its initial placement
    pub fn mounted(blueprint: &RacerBlueprint) -> Self {
        let mut rig = Self::new(blueprint);
        rig.mount_body(KinematicBody::from_config(&blueprint.body));
        let state = *rig.camera.state();
        rig.mount_camera(SceneCamera::new(state.position, state.orientation));
        rig
    }

    pub fn mount_body(&mut self, body: KinematicBody) {
        debug!("vehicle body mounted");
        self.body = Some(body);
    }

    pub fn mount_camera(&mut self, camera: SceneCamera) {
        debug!("scene camera mounted");
        self.scene_camera = Some(camera);
    }

    pub fn body(&self) -> Option<&KinematicBody> {
        self.body.as_ref()
    }

    pub fn scene_camera(&self) -> Option<&SceneCamera> {
        self.scene_camera.as_ref()
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn chase_camera(&self) -> &ChaseCamera {
        &self.camera
    }

    /// Vehicle position, or the origin before the body mounts
    pub fn position(&self) -> Vec3 {
        self.body
            .as_ref()
            .map(|b| b.translation())
            .unwrap_or_else(Vec3::zeros)
    }

    /// Command the body, advance it by `delta`, then follow with the camera
    ///
    /// # Errors
    /// The motion controller's `FrameSkip`; the body is not stepped. A
    /// camera skip is not an error, it leaves `FrameReport::camera` empty.
    pub fn step(&mut self, input: DriveInput, delta: f32) -> Result<FrameReport, FrameSkip> {
        let command = self.motion.update(self.body.as_mut(), input, delta)?;
        let body = self.body.as_mut().ok_or(FrameSkip::BodyNotReady)?;
        body.step(delta);
        let pose = body.pose();

        let camera = match self.camera.update(&pose, self.scene_camera.as_mut(), delta) {
            Ok(state) => Some(state),
            Err(skip) => {
                debug!(reason = skip.reason(), "camera skipped frame");
                None
            }
        };

        Ok(FrameReport {
            command,
            pose,
            camera,
        })
    }
}
