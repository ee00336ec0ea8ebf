//! # Sales Forecast Service
//!
//! Transport layer around [`sales_forecast`]: an axum HTTP server exposing
//! `POST /forecast` and `GET /health`, a command line interface and logging
//! setup.
//!
//! ## Example
//!
//! ```no_run
//! use sales_forecast::ForecastService;
//! use sales_forecast_service::http;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, http::app(ForecastService::default())).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod http;
pub mod logging;

pub use crate::cli::{Cli, Command};
pub use crate::http::{app, ApiError};
