//! Ease-in-out interpolation used by the descent integrator.

/// Blend from `from` to `to` with an ease-in-out curve.
///
/// `alpha` is clamped to `[0, 1]`. The first half eases in with
/// `0.5 * (2a)^exponent`, the second half mirrors it, so the curve leaves
/// `from` slowly, speeds up through the middle and settles into `to`.
#[must_use]
pub fn ease_in_out(from: f32, to: f32, alpha: f32, exponent: f32) -> f32 {
    let a = alpha.clamp(0.0, 1.0);
    let blend = if a < 0.5 {
        0.5 * (2.0 * a).powf(exponent)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - a)).powf(exponent)
    };
    from + (to - from) * blend
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(ease_in_out(-900.0, -300.0, 0.0, 3.0), -900.0);
        assert_eq!(ease_in_out(-900.0, -300.0, 1.0, 3.0), -300.0);
        assert!((ease_in_out(0.0, 10.0, 0.5, 3.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(ease_in_out(1.0, 2.0, -3.0, 3.0), 1.0);
        assert_eq!(ease_in_out(1.0, 2.0, 7.0, 3.0), 2.0);
    }

    #[test]
    fn slow_start_and_slow_finish() {
        // cubic: a quarter of the way in only 1/16 of the distance is covered
        assert!((ease_in_out(0.0, 1.0, 0.25, 3.0) - 0.0625).abs() < 1e-6);
        assert!((ease_in_out(0.0, 1.0, 0.75, 3.0) - 0.9375).abs() < 1e-6);
    }
}
