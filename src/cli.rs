//! Command line interface

use crate::logging::LogFormat;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sales_forecast::{ConfidenceBand, DataLoader, ForecastConfig, ForecastRequest, ForecastService};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sales-forecast")]
#[command(about = "Sales time series forecasting service", long_about = None)]
pub struct Cli {
    /// Log filter directive (e.g. info, sales_forecast=debug)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, env = "FORECAST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Forecast from a CSV file and print the response as JSON
    Predict(PredictArgs),
}

/// Pipeline settings shared by both commands
#[derive(Debug, Clone, Args)]
pub struct PipelineArgs {
    /// Confidence band shape (fixed or widening)
    #[arg(long, env = "FORECAST_CONFIDENCE_BAND", default_value = "widening")]
    pub confidence_band: ConfidenceBand,

    /// IQR multiplier used by the outlier filter
    #[arg(long, env = "FORECAST_OUTLIER_THRESHOLD", default_value_t = 2.0)]
    pub outlier_threshold: f64,
}

impl PipelineArgs {
    pub fn to_config(&self) -> Result<ForecastConfig> {
        if !self.outlier_threshold.is_finite() || self.outlier_threshold < 0.0 {
            anyhow::bail!(
                "Outlier threshold must be a non-negative number, got {}",
                self.outlier_threshold
            );
        }

        Ok(ForecastConfig {
            confidence_band: self.confidence_band,
            outlier_threshold: self.outlier_threshold,
            ..ForecastConfig::default()
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "FORECAST_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "FORECAST_PORT", default_value_t = 8000)]
    pub port: u16,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl ServeArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// CSV file with a date,value (or fecha,ventas) header
    #[arg(short, long)]
    pub input: PathBuf,

    /// Forecasting method
    #[arg(short, long, default_value = "moving_average")]
    pub method: String,

    /// Number of periods to forecast
    #[arg(short, long, default_value_t = 3)]
    pub periods: i64,

    /// Resampling frequency (daily, weekly, monthly)
    #[arg(short, long, default_value = "monthly")]
    pub frequency: String,

    /// Moving average window
    #[arg(long)]
    pub window_size: Option<i64>,

    /// Moving average blend factor
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Seasonal period, required by the seasonal method
    #[arg(long)]
    pub seasonality: Option<i64>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Run a forecast for `predict` and render it as pretty JSON
pub fn run_predict(args: &PredictArgs) -> Result<String> {
    let history = DataLoader::from_csv(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let request = ForecastRequest {
        historical_data: history,
        method: args.method.clone(),
        periods: args.periods,
        frequency: args.frequency.clone(),
        window_size: args.window_size,
        alpha: args.alpha,
        seasonality: args.seasonality,
    };

    let service = ForecastService::new(args.pipeline.to_config()?);
    let response = service.forecast(&request)?;

    Ok(serde_json::to_string_pretty(&response)?)
}
