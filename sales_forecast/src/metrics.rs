//! Accuracy metrics for forecasts
//!
//! Two policies share one calculator:
//!
//! - [`MetricsPolicy::RecentWindow`] pairs the last few actual values with
//!   the first few predictions and reports MAE, a floored and capped MAPE,
//!   RMSE and `accuracy = 100 - MAPE`.
//! - [`MetricsPolicy::FittedValues`] compares in-sample fitted values with the
//!   history they were fitted on and reports MAE and
//!   `accuracy = 100 - MAE / mean(actual) * 100`.
//!
//! Neither policy fails: inputs too short to measure give all-zero metrics.

use serde::{Deserialize, Serialize};

const MIN_METRIC_POINTS: usize = 3;

/// Accuracy statistics attached to a forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rmse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r2: Option<f64>,
    pub accuracy: f64,
}

impl Metrics {
    /// All-zero recent-window metrics
    pub fn zero_recent() -> Self {
        Self {
            mae: 0.0,
            mape: Some(0.0),
            rmse: Some(0.0),
            r2: None,
            accuracy: 0.0,
        }
    }

    /// All-zero fitted-value metrics
    pub fn zero_fitted() -> Self {
        Self::default()
    }

    pub fn with_rmse(mut self, rmse: f64) -> Self {
        self.rmse = Some(rmse);
        self
    }

    pub fn with_r2(mut self, r2: f64) -> Self {
        self.r2 = Some(r2);
        self
    }
}

/// How actual and predicted values are paired up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricsPolicy {
    /// Last `window` actuals against the first `window` predictions
    RecentWindow {
        window: usize,
        materiality_floor: f64,
        max_point_error: f64,
    },
    /// In-sample fitted values against the same-length actual history
    FittedValues,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        MetricsPolicy::RecentWindow {
            window: 3,
            materiality_floor: 1000.0,
            max_point_error: 0.5,
        }
    }
}

/// Computes [`Metrics`] under a chosen [`MetricsPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsCalculator {
    policy: MetricsPolicy,
}

impl MetricsCalculator {
    pub fn new(policy: MetricsPolicy) -> Self {
        Self { policy }
    }

    pub fn fitted() -> Self {
        Self::new(MetricsPolicy::FittedValues)
    }

    pub fn policy(&self) -> MetricsPolicy {
        self.policy
    }

    /// Compare `actual` with `predicted` under the configured policy
    pub fn calculate(&self, actual: &[f64], predicted: &[f64]) -> Metrics {
        match self.policy {
            MetricsPolicy::RecentWindow {
                window,
                materiality_floor,
                max_point_error,
            } => recent_window(actual, predicted, window, materiality_floor, max_point_error),
            MetricsPolicy::FittedValues => fitted_values(actual, predicted),
        }
    }
}

fn recent_window(
    actual: &[f64],
    predicted: &[f64],
    window: usize,
    floor: f64,
    cap: f64,
) -> Metrics {
    let window = window.max(1);
    let required = window.max(MIN_METRIC_POINTS);
    if actual.len() < required || predicted.len() < required {
        return Metrics::zero_recent();
    }

    let actual = &actual[actual.len() - window..];
    let predicted = &predicted[..window];

    let mae = mean_absolute_error(actual, predicted);
    let rmse = root_mean_squared_error(actual, predicted);

    let material: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a > floor)
        .map(|(a, p)| ((a - p) / a).abs().min(cap))
        .collect();
    let mape = if material.is_empty() {
        0.0
    } else {
        material.iter().sum::<f64>() / material.len() as f64 * 100.0
    };

    if !mae.is_finite() || !mape.is_finite() || !rmse.is_finite() {
        return Metrics::zero_recent();
    }

    Metrics {
        mae,
        mape: Some(mape),
        rmse: Some(rmse),
        r2: None,
        accuracy: (100.0 - mape).max(0.0),
    }
}

fn fitted_values(actual: &[f64], fitted: &[f64]) -> Metrics {
    let n = actual.len().min(fitted.len());
    if n < MIN_METRIC_POINTS {
        return Metrics::zero_fitted();
    }

    let actual = &actual[..n];
    let fitted = &fitted[..n];
    let mean = forecast_math::mean(actual);
    if mean == 0.0 || !mean.is_finite() {
        return Metrics::zero_fitted();
    }

    let mae = mean_absolute_error(actual, fitted);
    if !mae.is_finite() {
        return Metrics::zero_fitted();
    }

    Metrics {
        mae,
        mape: None,
        rmse: None,
        r2: None,
        accuracy: (100.0 - mae / mean * 100.0).max(0.0),
    }
}

/// Mean absolute error over paired values, `0.0` for empty input
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();
    forecast_math::mean(&errors)
}

/// Root mean squared error over paired values, `0.0` for empty input
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let squared: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .collect();
    forecast_math::mean(&squared).sqrt()
}
