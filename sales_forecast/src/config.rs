//! Tunable defaults for the forecasting pipeline

use crate::formatter::ConfidenceBand;
use crate::metrics::MetricsPolicy;
use crate::request::ForecastMethod;
use serde::{Deserialize, Serialize};

/// Settings shared by every request handled by a [`crate::ForecastService`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Moving average window when the request does not set one
    pub default_window_size: usize,
    /// Moving average blend factor when the request does not set one
    pub default_alpha: f64,
    /// Blend factor used when a strategy falls back to the moving average
    pub fallback_alpha: f64,
    /// IQR multiplier for the outlier filter
    pub outlier_threshold: f64,
    /// Strategies whose input goes through the outlier filter
    pub outlier_filtered_methods: Vec<ForecastMethod>,
    /// Shape of the band attached to each prediction
    pub confidence_band: ConfidenceBand,
    /// Number of trailing actuals compared in recent-window metrics
    pub recent_window: usize,
    /// Actuals at or below this value are ignored by MAPE
    pub materiality_floor: f64,
    /// Cap on a single point's relative error in MAPE
    pub max_point_error: f64,
    /// Minimum number of resampled periods needed to forecast
    pub min_points: usize,
    /// Longest forecast horizon a request may ask for
    pub max_periods: usize,
    /// Longest resampled history accepted, counted in periods
    pub max_prepared_periods: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_window_size: 3,
            default_alpha: 0.3,
            fallback_alpha: 0.3,
            outlier_threshold: forecast_math::statistics::DEFAULT_IQR_THRESHOLD,
            outlier_filtered_methods: vec![ForecastMethod::MovingAverage],
            confidence_band: ConfidenceBand::Widening,
            recent_window: 3,
            materiality_floor: 1000.0,
            max_point_error: 0.5,
            min_points: 2,
            max_periods: 1000,
            max_prepared_periods: 100_000,
        }
    }
}

impl ForecastConfig {
    /// Whether `method` runs on outlier-filtered input
    pub fn filters_outliers(&self, method: ForecastMethod) -> bool {
        self.outlier_filtered_methods.contains(&method)
    }

    /// Recent-window metrics policy built from these settings
    pub fn recent_window_policy(&self) -> MetricsPolicy {
        MetricsPolicy::RecentWindow {
            window: self.recent_window,
            materiality_floor: self.materiality_floor,
            max_point_error: self.max_point_error,
        }
    }
}
