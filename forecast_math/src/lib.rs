//! # Forecast Math
//!
//! Numeric building blocks used by the sales forecasting service.
//! Everything in here works on plain `&[f64]` sequences and knows nothing
//! about dates, requests or HTTP.

use thiserror::Error;

pub mod arima;
pub mod decomposition;
pub mod optimization;
pub mod regression;
pub mod smoothing;
pub mod statistics;

pub use arima::{Arima, ArimaOrder};
pub use decomposition::{seasonal_decompose, Decomposition};
pub use regression::LinearRegression;
pub use smoothing::{HoltLinear, HoltWinters};
pub use statistics::{filter_outliers, mean, percentile};

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Reject series with no variation, which every model here treats as degenerate.
pub(crate) fn ensure_not_constant(values: &[f64], what: &str) -> Result<()> {
    let first = match values.first() {
        Some(first) => *first,
        None => {
            return Err(MathError::InsufficientData(format!(
                "{} requires a non-empty series",
                what
            )))
        }
    };

    if values.iter().all(|v| (v - first).abs() < 1e-12) {
        return Err(MathError::CalculationError(format!(
            "{} cannot be fitted to a constant series",
            what
        )));
    }

    Ok(())
}
