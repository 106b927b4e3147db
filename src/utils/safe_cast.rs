//! Safe casting utilities for screen coordinates

use crate::{Error, Result};

/// Safely convert u32 to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds i32::MAX
pub fn u32_to_i32(value: u32) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Safely convert usize to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds i32::MAX
pub fn usize_to_i32(value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Truncate towards zero, then clamp into `[min, max]` for pixel coordinates
///
/// Non-finite values map to `min`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    // Ensure min <= max
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.trunc().clamp(f64::from(min), f64::from(max));
    (clamped as i32).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_u32_to_i32() {
        assert_eq!(u32_to_i32(42).unwrap(), 42);
        assert_eq!(u32_to_i32(0).unwrap(), 0);
        assert_eq!(u32_to_i32(i32::MAX as u32).unwrap(), i32::MAX);
        assert!(u32_to_i32(i32::MAX as u32 + 1).is_err());
        assert!(u32_to_i32(u32::MAX).is_err());
    }

    #[test]
    fn test_usize_to_i32() {
        assert_eq!(usize_to_i32(26).unwrap(), 26);
        assert_eq!(usize_to_i32(0).unwrap(), 0);
        assert_eq!(usize_to_i32(i32::MAX as usize).unwrap(), i32::MAX);
        assert!(usize_to_i32(i32::MAX as usize + 1).is_err());
    }

    #[test]
    fn test_f64_to_i32_clamp() {
        assert_eq!(f64_to_i32_clamp(50.7, 0, 100), 50);
        assert_eq!(f64_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(150.0, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(f64::NAN, 10, 100), 10);
        assert_eq!(f64_to_i32_clamp(f64::INFINITY, 10, 100), 10);

        // Swapped bounds
        assert_eq!(f64_to_i32_clamp(5.0, 100, 10), 10);
    }

    proptest! {
        #[test]
        fn prop_f64_to_i32_clamp_always_within_bounds(
            value in any::<f64>(),
            min in any::<i32>(),
            max in any::<i32>()
        ) {
            let (min, max) = if min <= max { (min, max) } else { (max, min) };
            let result = f64_to_i32_clamp(value, min, max);
            prop_assert!(result >= min);
            prop_assert!(result <= max);
        }

        #[test]
        fn prop_f64_to_i32_clamp_truncates_inside_range(value in -1000.0f64..1000.0) {
            let result = f64_to_i32_clamp(value, -2000, 2000);
            prop_assert_eq!(f64::from(result), value.trunc());
        }
    }
}
