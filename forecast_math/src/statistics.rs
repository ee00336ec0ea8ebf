//! Descriptive statistics and the interquartile-range outlier filter

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Default IQR multiplier used by [`filter_outliers`] callers.
pub const DEFAULT_IQR_THRESHOLD: f64 = 2.0;

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().mean()
}

/// Population variance, `0.0` for an empty slice
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().population_variance()
}

/// Percentile with linear interpolation between closest ranks.
///
/// `pct` is expressed in `[0, 100]`. Matches the default ("linear") method
/// used by most numeric libraries, so Q1 of `[10, 10, 11, 12, 13, 1000]` is
/// `10.25`.
pub fn percentile(data: &[f64], pct: f64) -> Result<f64> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a percentile of an empty series".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&pct) {
        return Err(MathError::InvalidInput(format!(
            "Percentile must be within [0, 100], got {}",
            pct
        )));
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Lower and upper fences `[Q1 - k*IQR, Q3 + k*IQR]`
pub fn iqr_bounds(data: &[f64], threshold: f64) -> Result<(f64, f64)> {
    let q1 = percentile(data, 25.0)?;
    let q3 = percentile(data, 75.0)?;
    let iqr = q3 - q1;

    Ok((q1 - threshold * iqr, q3 + threshold * iqr))
}

/// Drop values outside the IQR fences, keeping the original order.
///
/// Fewer than three values cannot give a meaningful IQR, so such input is
/// returned unchanged.
pub fn filter_outliers(data: &[f64], threshold: f64) -> Vec<f64> {
    if data.len() < 3 {
        return data.to_vec();
    }

    match iqr_bounds(data, threshold) {
        Ok((lower, upper)) => data
            .iter()
            .copied()
            .filter(|v| *v >= lower && *v <= upper)
            .collect(),
        Err(_) => data.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_variance() {
        assert_abs_diff_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(mean(&[]), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            population_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            4.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [10.0, 12.0, 11.0, 10.0, 13.0, 1000.0];
        assert_abs_diff_eq!(percentile(&data, 25.0).unwrap(), 10.25, epsilon = 1e-9);
        assert_abs_diff_eq!(percentile(&data, 75.0).unwrap(), 12.75, epsilon = 1e-9);
        assert_abs_diff_eq!(percentile(&data, 0.0).unwrap(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(percentile(&data, 100.0).unwrap(), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_percentile_rejects_bad_input() {
        assert!(percentile(&[], 50.0).is_err());
        assert!(percentile(&[1.0], 101.0).is_err());
    }

    #[test]
    fn test_filter_outliers_removes_spike() {
        let data = [10.0, 12.0, 11.0, 10.0, 13.0, 1000.0];
        let filtered = filter_outliers(&data, DEFAULT_IQR_THRESHOLD);
        assert_eq!(filtered, vec![10.0, 12.0, 11.0, 10.0, 13.0]);
    }

    #[test]
    fn test_filter_outliers_short_input_untouched() {
        assert_eq!(filter_outliers(&[1.0, 5000.0], 2.0), vec![1.0, 5000.0]);
        assert!(filter_outliers(&[], 2.0).is_empty());
    }

    #[test]
    fn test_filter_outliers_keeps_clean_data() {
        let data = [100.0, 110.0, 105.0, 95.0, 102.0];
        assert_eq!(filter_outliers(&data, 2.0), data.to_vec());
    }
}
