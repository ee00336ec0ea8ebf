//! Turns raw predictions into dated predictions with confidence bands

use crate::data::Frequency;
use crate::error::{ForecastError, Result};
use crate::response::{ConfidenceInterval, Prediction};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BASE_MARGIN: f64 = 0.20;
const MARGIN_PER_STEP: f64 = 0.05;

/// Width of the heuristic band around each prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// ±20% at every step
    Fixed,
    /// ±(20 + 5i)% at step `i` (0-based)
    #[default]
    Widening,
}

impl ConfidenceBand {
    /// Relative half-width of the band at forecast step `step`
    pub fn margin(&self, step: usize) -> f64 {
        match self {
            ConfidenceBand::Fixed => BASE_MARGIN,
            ConfidenceBand::Widening => BASE_MARGIN + MARGIN_PER_STEP * step as f64,
        }
    }

    /// Band around `value` at `step`; the lower bound never drops below zero
    pub fn interval(&self, value: f64, step: usize) -> ConfidenceInterval {
        let spread = value.abs() * self.margin(step);
        let lower = (value - spread).max(0.0);
        let upper = (value + spread).max(lower);
        ConfidenceInterval { lower, upper }
    }
}

impl FromStr for ConfidenceBand {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(ConfidenceBand::Fixed),
            "widening" => Ok(ConfidenceBand::Widening),
            _ => Err(ForecastError::InvalidParameter(format!(
                "Unknown confidence band: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceBand::Fixed => f.write_str("fixed"),
            ConfidenceBand::Widening => f.write_str("widening"),
        }
    }
}

/// Forecast dates after `last`, spaced by the frequency's fixed step.
///
/// Monthly steps are 30 days, not calendar months.
pub fn future_dates(last: NaiveDate, frequency: Frequency, periods: usize) -> Result<Vec<NaiveDate>> {
    let step = frequency.step_days();
    (1..=periods as u64)
        .map(|i| {
            last.checked_add_days(Days::new(step * i)).ok_or_else(|| {
                ForecastError::ComputationError(format!(
                    "Forecast date {} steps after {} is out of range",
                    i, last
                ))
            })
        })
        .collect()
}

/// Attaches dates and confidence bands to predictions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResponseFormatter {
    band: ConfidenceBand,
}

impl ResponseFormatter {
    pub fn new(band: ConfidenceBand) -> Self {
        Self { band }
    }

    pub fn band(&self) -> ConfidenceBand {
        self.band
    }

    pub fn format(
        &self,
        values: &[f64],
        last_period: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<Prediction>> {
        let dates = future_dates(last_period, frequency, values.len())?;

        Ok(values
            .iter()
            .zip(dates)
            .enumerate()
            .map(|(step, (&value, date))| Prediction {
                date,
                forecast_value: value,
                confidence_interval: self.band.interval(value, step),
            })
            .collect())
    }
}
