//! Additive seasonal decomposition forecasts

use crate::error::{ForecastError, Result};
use crate::metrics::{Metrics, MetricsCalculator};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::preprocessing::OutlierFilter;
use crate::response::ModelInfo;
use forecast_math::{seasonal_decompose, Decomposition};

/// Forecasts the recent level plus the last observed seasonal cycle.
///
/// Step `i` is `mean(last seasonality values) + seasonal[i % seasonality]`,
/// with the seasonal pattern taken from the final complete cycle of an
/// additive decomposition.
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    name: String,
    seasonality: usize,
    outlier_filter: Option<OutlierFilter>,
}

#[derive(Debug, Clone)]
pub struct TrainedSeasonalDecomposition {
    decomposition: Decomposition,
    base_level: f64,
    actual: Vec<f64>,
}

impl SeasonalDecomposition {
    pub fn new(seasonality: usize) -> Result<Self> {
        if seasonality == 0 {
            return Err(ForecastError::InvalidParameter(
                "Seasonality must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Seasonal Decomposition (period={})", seasonality),
            seasonality,
            outlier_filter: None,
        })
    }

    pub fn with_outlier_filter(mut self, filter: Option<OutlierFilter>) -> Self {
        self.outlier_filter = filter;
        self
    }

    pub fn seasonality(&self) -> usize {
        self.seasonality
    }
}

impl ForecastModel for SeasonalDecomposition {
    type Trained = TrainedSeasonalDecomposition;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let values = match &self.outlier_filter {
            Some(filter) => filter.apply(values),
            None => values.to_vec(),
        };

        let decomposition = seasonal_decompose(&values, self.seasonality)?;
        let base_level = forecast_math::mean(&values[values.len() - self.seasonality..]);

        Ok(TrainedSeasonalDecomposition {
            decomposition,
            base_level,
            actual: values,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSeasonalDecomposition {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let pattern = self.decomposition.last_cycle();
        Ok((0..horizon)
            .map(|i| self.base_level + pattern[i % pattern.len()])
            .collect())
    }

    fn evaluate(&self, _predictions: &[f64]) -> Metrics {
        // Only where the centred trend is defined
        let (actual, fitted): (Vec<f64>, Vec<f64>) = self
            .actual
            .iter()
            .zip(self.decomposition.fitted())
            .filter_map(|(a, f)| f.map(|f| (*a, f)))
            .unzip();

        MetricsCalculator::fitted().calculate(&actual, &fitted)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new("seasonal")
            .with("model", "additive")
            .with("seasonality", self.decomposition.period())
            .with("base_level", self.base_level)
            .with("seasonal_pattern", self.decomposition.last_cycle().to_vec())
    }
}
