//! Kinematic stand-in for the external physics body.
//!
//! Integrates velocity with the configured damping and rotation locks.
//! No contacts, gravity or mass response; it exists so the controllers
//! can be driven headless.

use contracts::{vec3, BodyConfig, PhysicsBody, Quat, Vec3};

#[derive(Debug, Clone)]
pub struct KinematicBody {
    linear_damping: f32,
    angular_damping: f32,
    enabled_rotations: [bool; 3],
    position: Vec3,
    rotation: Quat,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    sleeping: bool,
}

impl KinematicBody {
    /// Body at the configured spawn pose, awake and at rest
    pub fn from_config(config: &BodyConfig) -> Self {
        Self {
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            enabled_rotations: config.enabled_rotations,
            position: vec3(config.spawn_position),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), config.spawn_yaw_deg.to_radians()),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            sleeping: false,
        }
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.sleeping || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        self.linear_velocity *= 1.0 / (1.0 + dt * self.linear_damping);
        self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);

        let [rx, ry, rz] = self.enabled_rotations;
        let spin = Vec3::new(
            if rx { self.angular_velocity.x } else { 0.0 },
            if ry { self.angular_velocity.y } else { 0.0 },
            if rz { self.angular_velocity.z } else { 0.0 },
        );

        self.position += self.linear_velocity * dt;
        if spin != Vec3::zeros() {
            self.rotation = Quat::from_scaled_axis(spin * dt) * self.rotation;
        }
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    pub fn sleep(&mut self) {
        self.sleeping = true;
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Heading around +Y in degrees, positive to the left
    pub fn yaw_deg(&self) -> f32 {
        let forward = self.rotation * contracts::forward_axis();
        (-forward.x).atan2(-forward.z).to_degrees()
    }
}

impl PhysicsBody for KinematicBody {
    fn translation(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3, wake: bool) {
        self.linear_velocity = velocity;
        if wake {
            self.sleeping = false;
        }
    }

    fn set_angular_velocity(&mut self, velocity: Vec3, wake: bool) {
        self.angular_velocity = velocity;
        if wake {
            self.sleeping = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> KinematicBody {
        KinematicBody::from_config(&BodyConfig::default())
    }

    #[test]
    fn test_spawns_at_configured_pose() {
        let b = body();
        assert_eq!(b.translation(), Vec3::new(10.0, 12.5, 60.0));
        assert!(b.yaw_deg().abs() < 1e-5);
    }

    #[test]
    fn test_step_moves_and_damps() {
        let mut b = body();
        b.set_linear_velocity(Vec3::new(0.0, 0.0, -4.0), true);
        b.step(0.1);
        let v = b.linear_velocity();
        assert!((v.z + 4.0 / 1.25).abs() < 1e-5, "{v:?}");
        assert!(b.translation().z < 60.0);
    }

    #[test]
    fn test_only_yaw_rotation_applies() {
        let mut b = body();
        b.set_angular_velocity(Vec3::new(1.0, 0.5, 1.0), true);
        for _ in 0..10 {
            b.step(0.05);
        }
        let forward = b.rotation() * contracts::forward_axis();
        assert!(forward.y.abs() < 1e-5, "pitched: {forward:?}");
        assert!(b.yaw_deg() > 0.0, "positive yaw turns left");
    }

    #[test]
    fn test_sleeping_body_ignores_step_until_woken() {
        let mut b = body();
        b.sleep();
        b.set_linear_velocity(Vec3::new(1.0, 0.0, 0.0), false);
        b.step(0.1);
        assert_eq!(b.translation(), Vec3::new(10.0, 12.5, 60.0));
        assert!(b.is_sleeping());

        b.set_linear_velocity(Vec3::new(1.0, 0.0, 0.0), true);
        b.step(0.1);
        assert!(b.translation().x > 10.0);
    }
}
