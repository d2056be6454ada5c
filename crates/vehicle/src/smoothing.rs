//! Per-frame interpolation factors.

use contracts::SmoothingCurve;

/// Fraction of the remaining distance to cover this frame, in `[0, 1]`
///
/// `rate` is per second; `delta` is the frame time in seconds.
#[inline]
pub fn smoothing_factor(curve: SmoothingCurve, rate: f32, delta: f32) -> f32 {
    match curve {
        SmoothingCurve::Exponential => 1.0 - (-rate * delta).exp(),
        SmoothingCurve::Linear => (rate * delta).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delta_is_zero() {
        assert_eq!(smoothing_factor(SmoothingCurve::Exponential, 2.5, 0.0), 0.0);
        assert_eq!(smoothing_factor(SmoothingCurve::Linear, 2.5, 0.0), 0.0);
    }

    #[test]
    fn test_exponential_stays_below_one() {
        let f = smoothing_factor(SmoothingCurve::Exponential, 3.0, 10.0);
        assert!(f > 0.99 && f <= 1.0);
    }

    #[test]
    fn test_linear_clamps_long_frames() {
        assert_eq!(smoothing_factor(SmoothingCurve::Linear, 2.5, 1.0), 1.0);
        let f = smoothing_factor(SmoothingCurve::Linear, 2.5, 1.0 / 60.0);
        assert!((f - 2.5 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_exponential_close_to_linear_at_high_fps() {
        let exp = smoothing_factor(SmoothingCurve::Exponential, 2.5, 1.0 / 120.0);
        let lin = smoothing_factor(SmoothingCurve::Linear, 2.5, 1.0 / 120.0);
        assert!((exp - lin).abs() < 5e-4);
    }
}
