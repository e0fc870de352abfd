//! Float to pixel conversions for drawing

/// Clamp and truncate `value` to a pixel coordinate within `[min, max]`.
///
/// The bounds may be given in either order. Non-finite values land on the
/// lower bound, so a bad overlay value can never reach the drawing calls.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    (value.clamp(f64::from(min), f64::from(max)) as i32).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncates_towards_zero() {
        assert_eq!(f64_to_i32_clamp(50.7, 0, 100), 50);
        assert_eq!(f64_to_i32_clamp(399.99, 150, 400), 399);
    }

    #[test]
    fn test_out_of_range_and_non_finite() {
        assert_eq!(f64_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(150.0, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(f64::NAN, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(f64::INFINITY, 150, 400), 150);
        assert_eq!(f64_to_i32_clamp(5.0, 100, 0), 5);
    }

    proptest! {
        #[test]
        fn prop_always_within_bounds(
            value in any::<f64>(),
            a in any::<i32>(),
            b in any::<i32>()
        ) {
            let result = f64_to_i32_clamp(value, a, b);
            prop_assert!(result >= a.min(b));
            prop_assert!(result <= a.max(b));
        }
    }
}
