//! # Sales Forecast
//!
//! Turns a list of dated sales figures into a multi-period forecast with
//! confidence bands, accuracy metrics and model metadata.
//!
//! ## Features
//!
//! - Resampling of raw records onto daily, weekly (Monday-start) or monthly
//!   (month-end) periods, summing duplicates and zero-filling gaps
//! - Forecasting strategies: smoothed moving average, linear regression,
//!   additive seasonal decomposition, Holt-Winters exponential smoothing and
//!   ARIMA(1,1,1)
//! - IQR outlier filtering, enabled per strategy
//! - Recent-window and fitted-value accuracy metrics
//! - Automatic fallback to the moving average when a model cannot be fitted
//!
//! ## Quick Start
//!
//! ```rust
//! use sales_forecast::{ForecastRequest, ForecastService, HistoricalPoint};
//!
//! let history = vec![
//!     HistoricalPoint::new("2024-01-15", 1200.0),
//!     HistoricalPoint::new("2024-02-15", 1350.0),
//!     HistoricalPoint::new("2024-03-15", 1500.0),
//!     HistoricalPoint::new("2024-04-15", 1420.0),
//! ];
//!
//! let request = ForecastRequest::new(history, "moving_average", 3, "monthly");
//! let response = ForecastService::default().forecast(&request)?;
//!
//! assert_eq!(response.predictions.len(), 3);
//! assert_eq!(response.model_info.model_type, "moving_average");
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod formatter;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod request;
pub mod response;
pub mod service;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, Frequency, HistoricalPoint, TimeSeriesData};
pub use crate::error::ForecastError;
pub use crate::formatter::{ConfidenceBand, ResponseFormatter};
pub use crate::metrics::{Metrics, MetricsCalculator, MetricsPolicy};
pub use crate::models::{ForecastModel, ModelOutput, TrainedForecastModel};
pub use crate::preprocessing::OutlierFilter;
pub use crate::request::{ForecastMethod, ForecastParams, ForecastRequest};
pub use crate::response::{ConfidenceInterval, ForecastResponse, ModelInfo, Prediction};
pub use crate::service::{ForecastService, ForecastStage};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
