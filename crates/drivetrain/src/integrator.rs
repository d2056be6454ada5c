//! Fixed-step speed integration.

use contracts::{DrivetrainConfig, Gear};

/// Speed state machine advanced once per tick
///
/// Speed is always within `[0, max_speed]`.
#[derive(Debug, Clone)]
pub struct SpeedIntegrator {
    config: DrivetrainConfig,
    speed: f32,
    ticks: u64,
}

impl SpeedIntegrator {
    pub fn new(config: DrivetrainConfig) -> Self {
        Self::with_speed(config, 0.0)
    }

    /// Start from a given speed, clamped into range
    pub fn with_speed(config: DrivetrainConfig, speed: f32) -> Self {
        let speed = speed.clamp(0.0, config.max_speed);
        Self {
            config,
            speed,
            ticks: 0,
        }
    }

    /// Advance one tick under `gear`, returning the new speed
    pub fn tick(&mut self, gear: Gear) -> f32 {
        let next = match gear {
            Gear::Accelerate => self.speed + self.config.accel_rate,
            Gear::Brake => self.speed - self.config.brake_rate,
            Gear::Idle => self.speed - self.config.coast_rate,
        };
        self.speed = next.clamp(0.0, self.config.max_speed);
        self.ticks += 1;
        self.speed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &DrivetrainConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn integrator(speed: f32) -> SpeedIntegrator {
        SpeedIntegrator::with_speed(DrivetrainConfig::default(), speed)
    }

    #[test]
    fn test_accelerate_adds_rate() {
        let mut s = integrator(0.0);
        assert_eq!(s.tick(Gear::Accelerate), 2.0);
        assert_eq!(s.tick(Gear::Accelerate), 4.0);
    }

    #[test]
    fn test_accelerate_caps_at_max() {
        let mut s = integrator(199.0);
        assert_eq!(s.tick(Gear::Accelerate), 200.0);
        assert_eq!(s.tick(Gear::Accelerate), 200.0);
    }

    #[test]
    fn test_brake_floors_at_zero() {
        let mut s = integrator(7.0);
        assert_eq!(s.tick(Gear::Brake), 2.0);
        assert_eq!(s.tick(Gear::Brake), 0.0);
    }

    #[test]
    fn test_ten_idle_ticks_from_fifty() {
        let mut s = integrator(50.0);
        for _ in 0..10 {
            s.tick(Gear::Idle);
        }
        assert_eq!(s.speed(), 40.0);
        assert_eq!(s.ticks(), 10);
    }

    #[test]
    fn test_idle_stops_at_zero() {
        let mut s = integrator(0.5);
        assert_eq!(s.tick(Gear::Idle), 0.0);
        assert_eq!(s.tick(Gear::Idle), 0.0);
    }

    #[test]
    fn test_initial_speed_is_clamped() {
        assert_eq!(integrator(500.0).speed(), 200.0);
        assert_eq!(integrator(-3.0).speed(), 0.0);
    }

    #[test]
    fn test_speed_bounded_for_any_gear_sequence() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = integrator(0.0);
        for _ in 0..20_000 {
            let gear = match rng.random_range(0..3) {
                0 => Gear::Accelerate,
                1 => Gear::Brake,
                _ => Gear::Idle,
            };
            let speed = s.tick(gear);
            assert!((0.0..=200.0).contains(&speed), "speed = {speed}");
        }
    }

    #[test]
    fn test_custom_rates() {
        let mut s = SpeedIntegrator::new(DrivetrainConfig {
            max_speed: 10.0,
            accel_rate: 4.0,
            ..Default::default()
        });
        s.tick(Gear::Accelerate);
        s.tick(Gear::Accelerate);
        assert_eq!(s.tick(Gear::Accelerate), 10.0);
    }
}
