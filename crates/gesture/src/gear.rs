//! Throttle/brake detection from index-finger posture.

use contracts::{Gear, Hand, INDEX_MCP, INDEX_TIP};

/// Index finger is raised when its tip sits above the knuckle by more
/// than `margin` (image y grows downward).
#[inline]
pub fn is_index_up(hand: &Hand, margin: f32) -> bool {
    hand.landmark(INDEX_TIP).y < hand.landmark(INDEX_MCP).y - margin
}

/// Right index raised brakes, left index raised accelerates. Brake wins
/// when both are raised.
pub fn detect_gear(left: &Hand, right: &Hand, margin: f32) -> Gear {
    if is_index_up(right, margin) {
        Gear::Brake
    } else if is_index_up(left, margin) {
        Gear::Accelerate
    } else {
        Gear::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Handedness, Landmark, LANDMARK_COUNT};

    fn hand(handedness: Handedness, tip_y: f32, mcp_y: f32) -> Hand {
        let mut landmarks = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        landmarks[INDEX_TIP] = Landmark::new(0.5, tip_y);
        landmarks[INDEX_MCP] = Landmark::new(0.5, mcp_y);
        Hand::new(handedness, landmarks)
    }

    #[test]
    fn test_index_up_needs_margin() {
        let h = hand(Handedness::Left, 0.46, 0.5);
        assert!(!is_index_up(&h, 0.05));
        assert!(is_index_up(&h, 0.03));
    }

    #[test]
    fn test_right_index_brakes() {
        let left = hand(Handedness::Left, 0.5, 0.5);
        let right = hand(Handedness::Right, 0.3, 0.5);
        assert_eq!(detect_gear(&left, &right, 0.05), Gear::Brake);
    }

    #[test]
    fn test_left_index_accelerates() {
        let left = hand(Handedness::Left, 0.3, 0.5);
        let right = hand(Handedness::Right, 0.5, 0.5);
        assert_eq!(detect_gear(&left, &right, 0.05), Gear::Accelerate);
    }

    #[test]
    fn test_brake_has_priority() {
        let left = hand(Handedness::Left, 0.3, 0.5);
        let right = hand(Handedness::Right, 0.3, 0.5);
        assert_eq!(detect_gear(&left, &right, 0.05), Gear::Brake);
    }

    #[test]
    fn test_lowered_fingers_idle() {
        let left = hand(Handedness::Left, 0.6, 0.5);
        let right = hand(Handedness::Right, 0.6, 0.5);
        assert_eq!(detect_gear(&left, &right, 0.05), Gear::Idle);
    }
}
