//! Holt-Winters exponential smoothing with a non-seasonal fallback

use crate::error::{ForecastError, Result};
use crate::metrics::{Metrics, MetricsCalculator};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::preprocessing::OutlierFilter;
use crate::response::ModelInfo;
use forecast_math::{HoltLinear, HoltWinters};

/// Additive-trend exponential smoothing.
///
/// Seasonality is enabled only when the series is longer than two full
/// cycles; otherwise Holt's linear method is used. Smoothing parameters are
/// fitted by minimising the in-sample squared error.
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    name: String,
    seasonal_period: usize,
    outlier_filter: Option<OutlierFilter>,
}

#[derive(Debug, Clone)]
pub enum TrainedExponentialSmoothing {
    Seasonal { model: HoltWinters, actual: Vec<f64> },
    Trend { model: HoltLinear, actual: Vec<f64> },
}

impl ExponentialSmoothing {
    /// Create a model with the candidate seasonal period
    pub fn new(seasonal_period: usize) -> Result<Self> {
        if seasonal_period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (period={})", seasonal_period),
            seasonal_period,
            outlier_filter: None,
        })
    }

    pub fn with_outlier_filter(mut self, filter: Option<OutlierFilter>) -> Self {
        self.outlier_filter = filter;
        self
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let actual = match &self.outlier_filter {
            Some(filter) => filter.apply(values),
            None => values.to_vec(),
        };

        if actual.len() > 2 * self.seasonal_period {
            let model = HoltWinters::fit(&actual, self.seasonal_period)?;
            Ok(TrainedExponentialSmoothing::Seasonal { model, actual })
        } else {
            let model = HoltLinear::fit(&actual)?;
            Ok(TrainedExponentialSmoothing::Trend { model, actual })
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(match self {
            TrainedExponentialSmoothing::Seasonal { model, .. } => model.forecast(horizon),
            TrainedExponentialSmoothing::Trend { model, .. } => model.forecast(horizon),
        })
    }

    fn evaluate(&self, _predictions: &[f64]) -> Metrics {
        // Skip the observations consumed by initialisation
        let (actual, fitted, skip) = match self {
            TrainedExponentialSmoothing::Seasonal { model, actual } => {
                (actual, model.fitted_values(), model.period())
            }
            TrainedExponentialSmoothing::Trend { model, actual } => {
                (actual, model.fitted_values(), 1)
            }
        };

        MetricsCalculator::fitted().calculate(&actual[skip..], &fitted[skip..])
    }

    fn model_info(&self) -> ModelInfo {
        match self {
            TrainedExponentialSmoothing::Seasonal { model, .. } => {
                ModelInfo::new("exponential_smoothing")
                    .with("seasonal", true)
                    .with("seasonal_periods", model.period())
                    .with("smoothing_level", model.alpha())
                    .with("smoothing_trend", model.beta())
                    .with("smoothing_seasonal", model.gamma())
                    .with("sse", model.sse())
            }
            TrainedExponentialSmoothing::Trend { model, .. } => {
                ModelInfo::new("exponential_smoothing")
                    .with("seasonal", false)
                    .with("smoothing_level", model.alpha())
                    .with("smoothing_trend", model.beta())
                    .with("sse", model.sse())
            }
        }
    }
}
