//! Chase camera controller.
//!
//! Keeps the camera at a fixed offset behind and above the car, easing
//! position, look target and orientation independently so the view lags
//! slightly behind the car's motion.

use contracts::{
    quat_is_finite, up_axis, vec3, vec_is_finite, CameraConfig, CameraRig, Pose, Quat, Vec3,
};
use tracing::trace;

use crate::error::{check_delta, FrameSkip};
use crate::smoothing::smoothing_factor;

const DEGENERATE_EPS: f32 = 1.0e-6;

/// Camera state owned by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub look_target: Vec3,
    pub orientation: Quat,
}

#[derive(Debug, Clone)]
pub struct ChaseCamera {
    config: CameraConfig,
    offset: Vec3,
    state: CameraState,
}

impl ChaseCamera {
    /// Camera at the configured initial position, facing the initial target
    pub fn new(config: CameraConfig) -> Self {
        let position = vec3(config.initial_position);
        let look_target = vec3(config.initial_target);
        let orientation = look_rotation(&position, &look_target).unwrap_or_else(Quat::identity);
        Self {
            offset: vec3(config.offset),
            config,
            state: CameraState {
                position,
                look_target,
                orientation,
            },
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Where the camera wants to be for the given car pose
    pub fn ideal_position(&self, car: &Pose) -> Vec3 {
        car.position + car.orientation * self.offset
    }

    /// Jump straight to the ideal placement, e.g. after a respawn
    pub fn snap_to(&mut self, car: &Pose) {
        let position = self.ideal_position(car);
        let orientation =
            look_rotation(&position, &car.position).unwrap_or(self.state.orientation);
        self.state = CameraState {
            position,
            look_target: car.position,
            orientation,
        };
    }

    /// Ease toward the car and write the transform to the rig
    ///
    /// # Errors
    /// A `FrameSkip` when the rig is absent, the delta is invalid, or the
    /// car pose or the eased result is not finite. State is unchanged
    /// and nothing is written in that case.
    pub fn update<R>(
        &mut self,
        car: &Pose,
        rig: Option<&mut R>,
        delta: f32,
    ) -> Result<CameraState, FrameSkip>
    where
        R: CameraRig + ?Sized,
    {
        let rig = rig.ok_or(FrameSkip::CameraNotReady)?;
        check_delta(delta)?;
        if !car.is_finite() {
            return Err(FrameSkip::non_finite("vehicle pose"));
        }

        let curve = self.config.smoothing;
        let ideal = self.ideal_position(car);
        let position = self.state.position.lerp(
            &ideal,
            smoothing_factor(curve, self.config.position_rate, delta),
        );
        let look_target = self.state.look_target.lerp(
            &car.position,
            smoothing_factor(curve, self.config.target_rate, delta),
        );
        if !vec_is_finite(&position) || !vec_is_finite(&look_target) {
            return Err(FrameSkip::non_finite("camera position"));
        }

        let orientation = match look_rotation(&position, &look_target) {
            Some(look) => {
                let t = smoothing_factor(curve, self.config.orientation_rate, delta);
                let current = self.state.orientation;
                // half-turn apart: step along the relative rotation axis instead
                current
                    .try_slerp(&look, t, DEGENERATE_EPS)
                    .unwrap_or_else(|| current.rotation_to(&look).powf(t) * current)
            }
            None => {
                trace!("degenerate look direction, keeping orientation");
                self.state.orientation
            }
        };
        if !quat_is_finite(&orientation) {
            return Err(FrameSkip::non_finite("camera orientation"));
        }

        self.state = CameraState {
            position,
            look_target,
            orientation,
        };
        rig.set_transform(position, orientation);
        Ok(self.state)
    }
}

/// Rotation whose −Z axis points from `eye` to `target` with +Y up
///
/// `None` when the points coincide or the view is straight up or down.
pub fn look_rotation(eye: &Vec3, target: &Vec3) -> Option<Quat> {
    let dir = target - eye;
    let norm = dir.norm();
    if !norm.is_finite() || norm < DEGENERATE_EPS {
        return None;
    }
    let back = -dir / norm;
    let up = up_axis();
    if back.cross(&up).norm() < DEGENERATE_EPS {
        return None;
    }
    Some(Quat::face_towards(&back, &up))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneCamera;
    use contracts::{forward_axis, SmoothingCurve};
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn car_at(position: Vec3) -> Pose {
        Pose::at(position)
    }

    fn close(a: &Vec3, b: &Vec3, eps: f32) -> bool {
        (a - b).norm() < eps
    }

    #[test]
    fn test_ideal_position_is_behind_and_above() {
        let cam = ChaseCamera::new(CameraConfig::default());
        let car = car_at(Vec3::new(10.0, 12.5, 60.0));
        assert!(close(
            &cam.ideal_position(&car),
            &Vec3::new(10.0, 16.0, 72.0),
            1e-5
        ));
    }

    #[test]
    fn test_offset_rotates_with_car() {
        let cam = ChaseCamera::new(CameraConfig::default());
        let car = Pose::new(Vec3::zeros(), Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2));
        let ideal = cam.ideal_position(&car);
        // Facing −X, so "behind" is +X
        assert!(close(&ideal, &Vec3::new(12.0, 3.5, 0.0), 1e-4), "{ideal:?}");
    }

    #[test]
    fn test_missing_rig_skips_frame() {
        let mut cam = ChaseCamera::new(CameraConfig::default());
        let before = *cam.state();
        let result = cam.update::<SceneCamera>(&car_at(Vec3::zeros()), None, DT);
        assert_eq!(result, Err(FrameSkip::CameraNotReady));
        assert_eq!(*cam.state(), before);
    }

    #[test]
    fn test_camera_lags_then_converges() {
        let mut cam = ChaseCamera::new(CameraConfig::default());
        let mut rig = SceneCamera::default();
        let car = car_at(Vec3::new(10.0, 12.5, 60.0));
        let ideal = cam.ideal_position(&car);
        let start = cam.state().position;

        let first = cam.update(&car, Some(&mut rig), DT).unwrap();
        assert!(!close(&first.position, &ideal, 1e-3), "camera snapped");
        assert!((first.position - ideal).norm() < (start - ideal).norm());

        for _ in 0..600 {
            cam.update(&car, Some(&mut rig), DT).unwrap();
        }
        let state = cam.state();
        assert!(close(&state.position, &ideal, 1e-3), "{:?}", state.position);
        assert!(close(&state.look_target, &car.position, 1e-3));
        assert_eq!(rig.position(), state.position);
    }

    #[test]
    fn test_orientation_faces_car_after_settling() {
        let mut cam = ChaseCamera::new(CameraConfig::default());
        let mut rig = SceneCamera::default();
        let car = car_at(Vec3::new(0.0, 0.0, 0.0));
        for _ in 0..900 {
            cam.update(&car, Some(&mut rig), DT).unwrap();
        }
        let view = rig.orientation() * forward_axis();
        let expected = (car.position - rig.position()).normalize();
        assert!(close(&view, &expected, 1e-3), "{view:?} vs {expected:?}");
    }

    #[test]
    fn test_orientation_slerps_not_snaps() {
        let mut cam = ChaseCamera::new(CameraConfig::default());
        let mut rig = SceneCamera::default();
        let car = Pose::new(
            Vec3::new(10.0, 12.5, 60.0),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
        );
        let before = cam.state().orientation;
        let after = cam.update(&car, Some(&mut rig), DT).unwrap().orientation;
        let target = look_rotation(&cam.state().position, &cam.state().look_target).unwrap();
        let moved = before.angle_to(&after);
        assert!(moved < before.angle_to(&target) + 1e-4);
    }

    #[test]
    fn test_turns_around_when_car_is_behind_view() {
        let config = CameraConfig {
            position_rate: 0.0,
            target_rate: 1.0e6,
            orientation_rate: 6.0,
            smoothing: SmoothingCurve::Linear,
            initial_position: [0.0, 0.0, 0.0],
            initial_target: [0.0, 0.0, -10.0],
            ..CameraConfig::default()
        };
        let mut cam = ChaseCamera::new(config);
        let mut rig = SceneCamera::default();
        let start = cam.state().orientation;
        assert!(start.angle_to(&Quat::identity()) < 1e-5);

        // directly behind the current view direction
        let car = car_at(Vec3::new(0.0, 0.0, 10.0));
        let first = cam.update(&car, Some(&mut rig), DT).unwrap();
        assert!(start.angle_to(&first.orientation) > 0.1, "camera did not turn");

        for _ in 0..120 {
            cam.update(&car, Some(&mut rig), DT).unwrap();
        }
        let view = rig.orientation() * forward_axis();
        assert!(close(&view, &Vec3::new(0.0, 0.0, 1.0), 1e-3), "{view:?}");
    }

    #[test]
    fn test_non_finite_pose_skips_frame() {
        let mut cam = ChaseCamera::new(CameraConfig::default());
        let mut rig = SceneCamera::default();
        let before = *cam.state();
        let result = cam.update(&car_at(Vec3::new(f32::NAN, 0.0, 0.0)), Some(&mut rig), DT);
        assert!(matches!(result, Err(FrameSkip::NonFinite { .. })));
        assert_eq!(*cam.state(), before);
    }

    #[test]
    fn test_look_rotation_degenerate_cases() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(look_rotation(&p, &p).is_none());
        assert!(look_rotation(&p, &(p + Vec3::new(0.0, 5.0, 0.0))).is_none());
        assert!(look_rotation(&p, &(p + Vec3::new(0.0, 0.0, -5.0))).is_some());
    }

    #[test]
    fn test_look_rotation_keeps_identity_for_forward_view() {
        let q = look_rotation(&Vec3::zeros(), &Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(q.angle_to(&Quat::identity()) < 1e-5);
    }

    #[test]
    fn test_snap_to_places_camera_exactly() {
        let mut cam = ChaseCamera::new(CameraConfig::default());
        let car = car_at(Vec3::new(3.0, 0.0, -7.0));
        cam.snap_to(&car);
        assert!(close(&cam.state().position, &cam.ideal_position(&car), 1e-6));
        assert_eq!(cam.state().look_target, car.position);
    }
}
