//! Forecast response payload

use crate::metrics::Metrics;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Heuristic band around a point forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// One dated forecast value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub forecast_value: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// Which algorithm produced a forecast, plus its parameters and diagnostics.
///
/// Serialises as a flat JSON object with a `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ModelInfo {
    pub fn new(model_type: impl Into<String>) -> Self {
        Self {
            model_type: model_type.into(),
            details: Map::new(),
        }
    }

    /// Builder-style [`ModelInfo::insert`]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.details.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Everything returned for a successful forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub predictions: Vec<Prediction>,
    pub metrics: Metrics,
    pub model_info: ModelInfo,
}
