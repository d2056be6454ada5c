//! Steering angle from the two pinch points.
//!
//! The angle is measured with image y flipped to point up, so a positive
//! angle means the right hand is higher than the left: the wheel is turned
//! counter-clockwise and the car steers left.

use contracts::{Direction, Hand, INDEX_TIP, THUMB_TIP};

/// Midpoint between thumb tip and index tip
#[inline]
pub fn pinch_midpoint(hand: &Hand) -> (f32, f32) {
    let thumb = hand.landmark(THUMB_TIP);
    let index = hand.landmark(INDEX_TIP);
    ((thumb.x + index.x) * 0.5, (thumb.y + index.y) * 0.5)
}

/// Angle in degrees of the left→right pinch line, y-up
pub fn raw_steering_angle(left_mid: (f32, f32), right_mid: (f32, f32)) -> f32 {
    let dx = right_mid.0 - left_mid.0;
    let dy_up = left_mid.1 - right_mid.1;
    dy_up.atan2(dx).to_degrees()
}

/// Fold an angle into `(-90, 90]`
///
/// Hands crossed over read as the same wheel tilt as uncrossed hands.
#[inline]
pub fn normalize_angle(deg: f32) -> f32 {
    90.0 - (90.0 - deg).rem_euclid(180.0)
}

#[inline]
pub fn clamp_steering(deg: f32, limit: f32) -> f32 {
    deg.clamp(-limit, limit)
}

/// `> +threshold` steers left, `< -threshold` steers right
pub fn classify_direction(deg: f32, threshold: f32) -> Direction {
    if deg > threshold {
        Direction::Left
    } else if deg < -threshold {
        Direction::Right
    } else {
        Direction::Straight
    }
}
