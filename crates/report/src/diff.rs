//! Percentage difference against a baseline

use idbench_core::{Error, Result};

/// Signed percentage difference of `comparison` relative to `baseline`
///
/// The magnitude is `|comparison - baseline| / baseline * 100`, always
/// relative to the baseline, so the function is not antisymmetric. The sign
/// reports improvement: positive when `comparison` is smaller (faster or
/// more compact) than `baseline`, negative when it is larger.
///
/// # Errors
///
/// Returns `InvalidBaseline` when `baseline` is zero instead of producing an
/// infinite or NaN percentage.
pub fn calc_diff(baseline: u64, comparison: u64) -> Result<f64> {
    if baseline == 0 {
        return Err(Error::InvalidBaseline {
            metric: "baseline value".to_string(),
        });
    }
    let sign = if comparison > baseline { -1.0 } else { 1.0 };
    let magnitude = comparison.abs_diff(baseline) as f64 * 100.0 / baseline as f64;
    Ok(sign * magnitude)
}

/// Render a percentage difference as `+12.34%` / `-5.00%`
pub fn format_diff(diff: f64) -> String {
    format!("{:+.2}%", diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_improvement_is_positive() {
        assert_eq!(calc_diff(1000, 700).unwrap(), 30.0);
        assert_eq!(format_diff(calc_diff(1000, 700).unwrap()), "+30.00%");
    }

    #[test]
    fn test_regression_is_negative() {
        assert_eq!(calc_diff(1000, 1250).unwrap(), -25.0);
        assert_eq!(format_diff(calc_diff(1000, 1250).unwrap()), "-25.00%");
    }

    #[test]
    fn test_asymmetric() {
        // 100 -> 200 is a 100% regression, 200 -> 100 only a 50% improvement
        assert_eq!(calc_diff(100, 200).unwrap(), -100.0);
        assert_eq!(calc_diff(200, 100).unwrap(), 50.0);
    }

    #[test]
    fn test_zero_baseline_rejected() {
        let err = calc_diff(0, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseline { .. }));
        assert!(calc_diff(0, 0).is_err());
    }

    #[test]
    fn test_zero_comparison() {
        assert_eq!(calc_diff(10, 0).unwrap(), 100.0);
    }

    proptest! {
        #[test]
        fn equal_values_diff_is_zero(b in 1u64..u64::MAX) {
            prop_assert_eq!(calc_diff(b, b).unwrap(), 0.0);
        }

        #[test]
        fn positive_iff_comparison_smaller(b in 1u64..1_000_000_000, c in 0u64..1_000_000_000) {
            let diff = calc_diff(b, c).unwrap();
            prop_assert!(diff.is_finite());
            prop_assert_eq!(diff > 0.0, c < b);
            prop_assert_eq!(diff < 0.0, c > b);
        }
    }
}
