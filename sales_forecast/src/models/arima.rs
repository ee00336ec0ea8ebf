//! Fixed-order ARIMA forecasts

use crate::error::Result;
use crate::metrics::{Metrics, MetricsCalculator};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::preprocessing::OutlierFilter;
use crate::response::ModelInfo;
use forecast_math::{Arima, ArimaOrder};

/// The order used by the service; no order search is performed
pub const DEFAULT_ORDER: ArimaOrder = ArimaOrder::new(1, 1, 1);

/// ARIMA model fitted by conditional sum of squares
#[derive(Debug, Clone)]
pub struct ArimaModel {
    name: String,
    order: ArimaOrder,
    outlier_filter: Option<OutlierFilter>,
}

#[derive(Debug, Clone)]
pub struct TrainedArima {
    model: Arima,
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

impl ArimaModel {
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: format!("ARIMA({},{},{})", order.p, order.d, order.q),
            order,
            outlier_filter: None,
        }
    }

    pub fn with_outlier_filter(mut self, filter: Option<OutlierFilter>) -> Self {
        self.outlier_filter = filter;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArima;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let model = match &self.outlier_filter {
            Some(filter) => Arima::fit(&filter.apply(values), self.order)?,
            None => Arima::fit(values, self.order)?,
        };
        Ok(TrainedArima { model })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArima {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(self.model.forecast(horizon))
    }

    fn evaluate(&self, _predictions: &[f64]) -> Metrics {
        MetricsCalculator::fitted()
            .calculate(self.model.aligned_actuals(), self.model.fitted_values())
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new("arima")
            .with("order", self.model.order().as_array().to_vec())
            .with("aic", self.model.aic())
            .with("ar", self.model.ar_coefficients().to_vec())
            .with("ma", self.model.ma_coefficients().to_vec())
            .with("sigma2", self.model.sigma2())
    }
}
