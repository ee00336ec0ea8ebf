//! Request orchestration: validation, preparation, dispatch, fallback and formatting

use crate::config::ForecastConfig;
use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::formatter::ResponseFormatter;
use crate::metrics::MetricsCalculator;
use crate::models::{
    ArimaModel, ExponentialSmoothing, ForecastModel, LinearTrend, ModelOutput, MovingAverage,
    SeasonalDecomposition,
};
use crate::preprocessing::OutlierFilter;
use crate::request::{ForecastMethod, ForecastParams, ForecastRequest};
use crate::response::ForecastResponse;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastStage {
    Received,
    Validated,
    Prepared,
    Forecasted,
    Formatted,
    Returned,
    Failed,
}

impl fmt::Display for ForecastStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForecastStage::Received => "received",
            ForecastStage::Validated => "validated",
            ForecastStage::Prepared => "prepared",
            ForecastStage::Forecasted => "forecasted",
            ForecastStage::Formatted => "formatted",
            ForecastStage::Returned => "returned",
            ForecastStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Stateless forecast orchestrator.
///
/// Holds only configuration, so one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    config: ForecastConfig,
}

impl ForecastService {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run a request end to end.
    ///
    /// Client mistakes come back as [`ForecastError::ValidationError`]. A
    /// failing strategy other than the moving average is replaced by the
    /// moving average, and the fallback is recorded in `model_info`.
    #[instrument(
        skip(self, request),
        fields(
            method = %request.method,
            frequency = %request.frequency,
            periods = request.periods,
        )
    )]
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        let mut stage = ForecastStage::Received;
        info!(points = request.historical_data.len(), "Received forecast request");

        match self.run(request, &mut stage) {
            Ok(response) => Ok(response),
            Err(err) => {
                let failed_after = stage;
                advance(&mut stage, ForecastStage::Failed);
                error!(
                    failed_after = %failed_after,
                    client_error = err.is_client_error(),
                    error = %err,
                    "Forecast request failed"
                );
                Err(err)
            }
        }
    }

    fn run(&self, request: &ForecastRequest, stage: &mut ForecastStage) -> Result<ForecastResponse> {
        let params = request.validate(&self.config)?;
        advance(stage, ForecastStage::Validated);

        let series = TimeSeriesData::from_points_limited(
            &request.historical_data,
            params.frequency,
            self.config.max_prepared_periods,
        )?;
        if series.len() < self.config.min_points {
            return Err(ForecastError::ValidationError(format!(
                "Insufficient data: at least {} periods are required after resampling, got {}",
                self.config.min_points,
                series.len()
            )));
        }
        let last_period = series.last_period().ok_or_else(|| {
            ForecastError::DataError("Prepared series has no periods".to_string())
        })?;
        if params.frequency.horizon_end(last_period, params.periods).is_none() {
            return Err(ForecastError::ValidationError(format!(
                "A horizon of {} {} periods after {} is out of the supported date range",
                params.periods, params.frequency, last_period
            )));
        }
        info!(prepared = series.len(), "Prepared time series");
        advance(stage, ForecastStage::Prepared);

        let output = self.dispatch(&params, series.values())?;
        advance(stage, ForecastStage::Forecasted);

        let predictions = ResponseFormatter::new(self.config.confidence_band).format(
            &output.predictions,
            last_period,
            params.frequency,
        )?;
        advance(stage, ForecastStage::Formatted);

        let response = ForecastResponse {
            predictions,
            metrics: output.metrics,
            model_info: output.model_info,
        };
        advance(stage, ForecastStage::Returned);
        Ok(response)
    }

    fn dispatch(&self, params: &ForecastParams, values: &[f64]) -> Result<ModelOutput> {
        let periods = params.periods;

        let attempt = match params.method {
            ForecastMethod::MovingAverage => {
                return self
                    .moving_average(params.window_size, params.alpha)?
                    .forecast(values, periods);
            }
            ForecastMethod::LinearRegression => LinearTrend::new()
                .with_outlier_filter(self.outlier_filter(params.method))
                .forecast(values, periods),
            ForecastMethod::Seasonal => {
                let seasonality = params.seasonality.ok_or_else(|| {
                    ForecastError::ValidationError(
                        "Seasonality parameter is required for the seasonal method".to_string(),
                    )
                })?;
                SeasonalDecomposition::new(seasonality).and_then(|model| {
                    model
                        .with_outlier_filter(self.outlier_filter(params.method))
                        .forecast(values, periods)
                })
            }
            ForecastMethod::ExponentialSmoothing => {
                ExponentialSmoothing::new(params.frequency.seasonal_period()).and_then(|model| {
                    model
                        .with_outlier_filter(self.outlier_filter(params.method))
                        .forecast(values, periods)
                })
            }
            ForecastMethod::Arima => ArimaModel::default()
                .with_outlier_filter(self.outlier_filter(params.method))
                .forecast(values, periods),
        };

        match attempt {
            Ok(output) => Ok(output),
            Err(err) => self.fall_back(params, values, err),
        }
    }

    fn fall_back(
        &self,
        params: &ForecastParams,
        values: &[f64],
        reason: ForecastError,
    ) -> Result<ModelOutput> {
        warn!(
            method = %params.method,
            error = %reason,
            "Strategy failed, falling back to moving average"
        );

        let mut output = self
            .moving_average(params.window_size, self.config.fallback_alpha)?
            .forecast(values, params.periods)?;
        output.model_info.insert("fallback_from", params.method.as_str());
        output.model_info.insert("fallback_reason", reason.to_string());
        Ok(output)
    }

    fn moving_average(&self, window: usize, alpha: f64) -> Result<MovingAverage> {
        Ok(MovingAverage::new(window, alpha)?
            .with_outlier_filter(self.outlier_filter(ForecastMethod::MovingAverage))
            .with_metrics(MetricsCalculator::new(self.config.recent_window_policy())))
    }

    fn outlier_filter(&self, method: ForecastMethod) -> Option<OutlierFilter> {
        self.config
            .filters_outliers(method)
            .then(|| OutlierFilter::new(self.config.outlier_threshold))
    }
}

fn advance(stage: &mut ForecastStage, next: ForecastStage) {
    debug!(from = %stage, to = %next, "Forecast stage transition");
    *stage = next;
}
