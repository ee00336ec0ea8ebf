//! Smoothed moving average with recursive forecasting

use crate::error::{ForecastError, Result};
use crate::metrics::{Metrics, MetricsCalculator};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::preprocessing::OutlierFilter;
use crate::response::ModelInfo;

/// Moving average blended with the latest value.
///
/// Each step averages the trailing `window` values of the working series and
/// blends that mean with the last value:
/// `next = alpha * mean + (1 - alpha) * last`. The result is appended to the
/// working series, so later steps build on earlier predictions.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
    /// Weight of the window mean against the last value
    alpha: f64,
    /// Optional outlier filter applied to the training values
    outlier_filter: Option<OutlierFilter>,
    /// How accuracy is measured
    metrics: MetricsCalculator,
}

/// Trained moving average model
#[derive(Debug, Clone)]
pub struct TrainedMovingAverage {
    window: usize,
    alpha: f64,
    /// Series the forecast recursion starts from (filtered if enabled)
    working: Vec<f64>,
    /// Unfiltered series, used for metrics
    actual: Vec<f64>,
    outliers_removed: usize,
    metrics: MetricsCalculator,
}

impl MovingAverage {
    /// Create a new moving average model
    pub fn new(window: usize, alpha: f64) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Moving Average (window={}, alpha={})", window, alpha),
            window,
            alpha,
            outlier_filter: None,
            metrics: MetricsCalculator::default(),
        })
    }

    /// Filter outliers out of the training values before forecasting
    pub fn with_outlier_filter(mut self, filter: Option<OutlierFilter>) -> Self {
        self.outlier_filter = filter;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCalculator) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ForecastModel for MovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        let working = match &self.outlier_filter {
            Some(filter) => filter.apply(values),
            None => values.to_vec(),
        };
        // The IQR fences always keep the central values, but guard anyway
        let working = if working.is_empty() {
            values.to_vec()
        } else {
            working
        };

        Ok(TrainedMovingAverage {
            window: self.window,
            alpha: self.alpha,
            outliers_removed: values.len() - working.len(),
            working,
            actual: values.to_vec(),
            metrics: self.metrics,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedMovingAverage {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut series = self.working.clone();
        let mut predictions = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let start = series.len().saturating_sub(self.window);
            let window_mean = forecast_math::mean(&series[start..]);
            let last = series.last().copied().ok_or_else(|| {
                ForecastError::ComputationError("Working series is empty".to_string())
            })?;

            let next = self.alpha * window_mean + (1.0 - self.alpha) * last;
            predictions.push(next);
            series.push(next);
        }

        Ok(predictions)
    }

    fn evaluate(&self, predictions: &[f64]) -> Metrics {
        self.metrics.calculate(&self.actual, predictions)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new("moving_average")
            .with("window_size", self.window)
            .with("alpha", self.alpha)
            .with("outliers_removed", self.outliers_removed)
    }
}
