//! Least-squares trend line over the observation index

use crate::error::Result;
use crate::metrics::{root_mean_squared_error, Metrics, MetricsCalculator};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::preprocessing::OutlierFilter;
use crate::response::ModelInfo;
use forecast_math::LinearRegression;

/// Fits `value = slope * index + intercept` and extends the line
#[derive(Debug, Clone, Default)]
pub struct LinearTrend {
    outlier_filter: Option<OutlierFilter>,
}

#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    regression: LinearRegression,
    actual: Vec<f64>,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outlier_filter(mut self, filter: Option<OutlierFilter>) -> Self {
        self.outlier_filter = filter;
        self
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let values = match &self.outlier_filter {
            Some(filter) => filter.apply(values),
            None => values.to_vec(),
        };
        let regression = LinearRegression::fit(&values)?;

        Ok(TrainedLinearTrend {
            regression,
            actual: values,
        })
    }

    fn name(&self) -> &str {
        "Linear Regression"
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(self.regression.forecast(horizon))
    }

    fn evaluate(&self, _predictions: &[f64]) -> Metrics {
        let fitted = self.regression.fitted_values();
        MetricsCalculator::fitted()
            .calculate(&self.actual, &fitted)
            .with_rmse(root_mean_squared_error(&self.actual, &fitted))
            .with_r2(self.regression.r_squared())
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new("linear_regression")
            .with("slope", self.regression.slope())
            .with("intercept", self.regression.intercept())
            .with("r_squared", self.regression.r_squared())
    }
}
