//! Input clean-up applied before a strategy sees the series

use forecast_math::statistics::DEFAULT_IQR_THRESHOLD;
use tracing::info;

/// Interquartile-range outlier filter.
///
/// Drops values outside `[Q1 - k*IQR, Q3 + k*IQR]`. Series shorter than three
/// points pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    threshold: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_IQR_THRESHOLD,
        }
    }
}

impl OutlierFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Filtered copy of `values`
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        let filtered = forecast_math::filter_outliers(values, self.threshold);
        let removed = values.len() - filtered.len();
        if removed > 0 {
            info!(
                removed,
                original = values.len(),
                remaining = filtered.len(),
                threshold = self.threshold,
                "Removed outliers from series"
            );
        }
        filtered
    }
}
