//! Forecasting strategies for prepared sales series

use crate::error::{ForecastError, Result};
use crate::metrics::Metrics;
use crate::response::ModelInfo;
use std::fmt::Debug;

/// What a strategy hands back to the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Point forecasts, one per requested period
    pub predictions: Vec<f64>,
    /// Accuracy of the fit
    pub metrics: Metrics,
    /// Algorithm name, parameters and diagnostics
    pub model_info: ModelInfo,
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Accuracy metrics, given the forecast just produced
    fn evaluate(&self, predictions: &[f64]) -> Metrics;

    /// Parameters and diagnostics of the fitted model
    fn model_info(&self) -> ModelInfo;
}

/// Forecast model that can be trained on a prepared series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the series values
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Train on `values` and forecast `periods` steps ahead
    fn forecast(&self, values: &[f64], periods: usize) -> Result<ModelOutput> {
        let trained = self.train(values)?;
        let predictions = trained.forecast(periods)?;

        if predictions.len() != periods {
            return Err(ForecastError::ComputationError(format!(
                "{} produced {} predictions, expected {}",
                self.name(),
                predictions.len(),
                periods
            )));
        }
        if let Some(bad) = predictions.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(format!(
                "{} produced a non-finite prediction ({})",
                self.name(),
                bad
            )));
        }

        let metrics = trained.evaluate(&predictions);
        let model_info = trained.model_info().with("periods", periods);

        Ok(ModelOutput {
            predictions,
            metrics,
            model_info,
        })
    }
}

pub mod arima;
pub mod exponential_smoothing;
pub mod linear_regression;
pub mod moving_average;
pub mod seasonal;

pub use arima::ArimaModel;
pub use exponential_smoothing::ExponentialSmoothing;
pub use linear_regression::LinearTrend;
pub use moving_average::MovingAverage;
pub use seasonal::SeasonalDecomposition;
