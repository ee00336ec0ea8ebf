//! Incoming forecast requests and their validation

use crate::config::ForecastConfig;
use crate::data::{Frequency, HistoricalPoint};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecasting strategies a request can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    LinearRegression,
    Seasonal,
    ExponentialSmoothing,
    Arima,
}

impl ForecastMethod {
    /// Canonical name, also used as `model_info.type`
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::LinearRegression => "linear_regression",
            ForecastMethod::Seasonal => "seasonal",
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::Arima => "arima",
        }
    }
}

impl FromStr for ForecastMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "moving_average" | "promedio_movil" => Ok(ForecastMethod::MovingAverage),
            "linear_regression" | "lineal" => Ok(ForecastMethod::LinearRegression),
            "seasonal" | "estacional" => Ok(ForecastMethod::Seasonal),
            "exponential_smoothing" | "holt_winters" | "suavizado_exponencial" => {
                Ok(ForecastMethod::ExponentialSmoothing)
            }
            "arima" => Ok(ForecastMethod::Arima),
            _ => Err(ForecastError::ValidationError(format!(
                "Unsupported method: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forecast request as received from a caller.
///
/// Method and frequency stay as raw strings and numeric parameters stay
/// signed so that bad values are reported by [`ForecastRequest::validate`]
/// as client errors rather than rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub historical_data: Vec<HistoricalPoint>,
    pub method: String,
    pub periods: i64,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<i64>,
}

impl ForecastRequest {
    pub fn new(
        historical_data: Vec<HistoricalPoint>,
        method: impl Into<String>,
        periods: i64,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            historical_data,
            method: method.into(),
            periods,
            frequency: frequency.into(),
            window_size: None,
            alpha: None,
            seasonality: None,
        }
    }

    pub fn with_window_size(mut self, window_size: i64) -> Self {
        self.window_size = Some(window_size);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_seasonality(mut self, seasonality: i64) -> Self {
        self.seasonality = Some(seasonality);
        self
    }

    /// Check the request and resolve defaults from `config`
    pub fn validate(&self, config: &ForecastConfig) -> Result<ForecastParams> {
        let method: ForecastMethod = self.method.parse()?;
        let frequency: Frequency = self.frequency.parse()?;

        if self.periods < 1 {
            return Err(ForecastError::ValidationError(format!(
                "Periods must be at least 1, got {}",
                self.periods
            )));
        }
        if self.periods as u64 > config.max_periods as u64 {
            return Err(ForecastError::ValidationError(format!(
                "Periods must be at most {}, got {}",
                config.max_periods, self.periods
            )));
        }

        if let Some((index, point)) = self
            .historical_data
            .iter()
            .enumerate()
            .find(|(_, p)| !p.value.is_finite() || p.value < 0.0)
        {
            return Err(ForecastError::ValidationError(format!(
                "Historical record {} has value {}, expected a finite non-negative number",
                index, point.value
            )));
        }

        let window_size = match self.window_size {
            Some(w) if w < 1 => {
                return Err(ForecastError::ValidationError(format!(
                    "Window size must be at least 1, got {}",
                    w
                )))
            }
            Some(w) => w as usize,
            None => config.default_window_size,
        };

        let alpha = match self.alpha {
            Some(a) if !(0.0..=1.0).contains(&a) => {
                return Err(ForecastError::ValidationError(format!(
                    "Alpha must be between 0 and 1, got {}",
                    a
                )))
            }
            Some(a) => a,
            None => config.default_alpha,
        };

        let seasonality = match self.seasonality {
            Some(s) if s < 1 => {
                return Err(ForecastError::ValidationError(format!(
                    "Seasonality must be at least 1, got {}",
                    s
                )))
            }
            Some(s) => Some(s as usize),
            None => None,
        };

        if method == ForecastMethod::Seasonal && seasonality.is_none() {
            return Err(ForecastError::ValidationError(
                "Seasonality parameter is required for the seasonal method".to_string(),
            ));
        }

        Ok(ForecastParams {
            method,
            frequency,
            periods: usize::try_from(self.periods).unwrap_or(usize::MAX),
            window_size,
            alpha,
            seasonality,
        })
    }
}

/// A validated request with defaults filled in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    pub method: ForecastMethod,
    pub frequency: Frequency,
    pub periods: usize,
    pub window_size: usize,
    pub alpha: f64,
    pub seasonality: Option<usize>,
}
