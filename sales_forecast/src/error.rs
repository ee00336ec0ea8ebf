//! Error types for the sales_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Request rejected before any computation ran
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid model parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed or missing historical records
    #[error("Data error: {0}")]
    DataError(String),

    /// A model could not be fitted or produced unusable output
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// Error from the numeric routines
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while reading CSV input
    #[error("CSV error: {0}")]
    CsvError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl ForecastError {
    /// Whether the caller caused the error (bad request rather than a server fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::ValidationError(_) | ForecastError::InvalidParameter(_)
        )
    }

    /// HTTP-style status classification
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}
