//! Landmark synthesizer
//!
//! Builds plausible two-hand poses for a requested gear and wheel tilt.
//! Used by the mock source and by tests across the workspace.

use contracts::{
    Gear, Hand, HandSet, Handedness, Landmark, INDEX_MCP, INDEX_TIP, LANDMARK_COUNT, THUMB_TIP,
    WRIST,
};

/// Image-space centre of the virtual wheel
pub const WHEEL_CENTER: (f32, f32) = (0.5, 0.5);

/// Half distance between the two pinch points
pub const WHEEL_RADIUS: f32 = 0.2;

const PINCH_GAP: f32 = 0.02;
const KNUCKLE_DROP: f32 = 0.12;

/// Hand whose thumb/index pinch midpoint sits at `pinch`
pub fn hand(handedness: Handedness, pinch: (f32, f32), index_up: bool) -> Hand {
    let (x, y) = pinch;
    let mut landmarks = [Landmark::new(x, y + 0.08); LANDMARK_COUNT];
    landmarks[WRIST] = Landmark::new(x, y + 0.18);
    landmarks[THUMB_TIP] = Landmark::new(x, y + PINCH_GAP);
    landmarks[INDEX_TIP] = Landmark::new(x, y - PINCH_GAP);
    // knuckle below the tip when raised, above it when curled
    landmarks[INDEX_MCP] = if index_up {
        Landmark::new(x, y - PINCH_GAP + KNUCKLE_DROP)
    } else {
        Landmark::new(x, y - PINCH_GAP - PINCH_GAP)
    };
    Hand::new(handedness, landmarks)
}

/// Pinch points for a wheel tilted by `steering_deg` (positive lifts the
/// right hand)
pub fn pinch_points(steering_deg: f32) -> ((f32, f32), (f32, f32)) {
    let theta = steering_deg.to_radians();
    let dx = WHEEL_RADIUS * theta.cos();
    let dy = WHEEL_RADIUS * theta.sin();
    let (cx, cy) = WHEEL_CENTER;
    ((cx - dx, cy + dy), (cx + dx, cy - dy))
}

pub fn hand_set_at(timestamp: f64, gear: Gear, steering_deg: f32) -> HandSet {
    let (left_pinch, right_pinch) = pinch_points(steering_deg);
    let left = hand(Handedness::Left, left_pinch, gear == Gear::Accelerate);
    let right = hand(Handedness::Right, right_pinch, gear == Gear::Brake);
    HandSet::both(timestamp, left, right)
}

/// Two-hand pose that reads back as `gear` and `steering_deg`
pub fn hand_set(gear: Gear, steering_deg: f32) -> HandSet {
    hand_set_at(0.0, gear, steering_deg)
}

/// Only the left hand in view
pub fn lone_hand(timestamp: f64) -> HandSet {
    let (left_pinch, _) = pinch_points(0.0);
    HandSet::single(timestamp, hand(Handedness::Left, left_pinch, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Direction, GestureConfig};
    use gesture::GestureInterpreter;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_reads_back_gear() {
        let interpreter = GestureInterpreter::new(GestureConfig::default());
        for gear in [Gear::Idle, Gear::Accelerate, Gear::Brake] {
            let signal = interpreter.interpret(&hand_set(gear, 0.0)).unwrap();
            assert_eq!(signal.gear, gear);
            assert_eq!(signal.direction, Direction::Straight);
        }
    }

    #[test]
    fn test_reads_back_steering_within_limit() {
        let interpreter = GestureInterpreter::new(GestureConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let deg: f32 = rng.random_range(-29.0..29.0);
            let signal = interpreter.interpret(&hand_set(Gear::Idle, deg)).unwrap();
            assert!((signal.steering_angle_deg - deg).abs() < 1e-3, "{deg}");
        }
    }

    #[test]
    fn test_lone_hand_has_no_pair() {
        assert!(lone_hand(1.0).pair().is_none());
    }
}
