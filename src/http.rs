//! HTTP surface of the forecasting service

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sales_forecast::{ForecastError, ForecastRequest, ForecastResponse, ForecastService};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Build the router with CORS and request tracing
pub fn app(service: ForecastService) -> Router {
    Router::new()
        .route("/forecast", post(forecast))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(service))
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, service: ForecastService) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr, "Starting sales forecast server");

    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "sales-forecast"
    }))
}

async fn forecast(
    State(service): State<Arc<ForecastService>>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let Json(request) = payload?;

    // Model fitting is CPU-bound; keep it off the async workers
    let response = tokio::task::spawn_blocking(move || service.forecast(&request)).await??;

    Ok(Json(response))
}

/// Error rendered as `{"detail": ..., "status": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected malformed forecast request");
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        error!(error = %err, "Forecast task did not complete");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Forecast computation was interrupted",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "detail": self.detail,
            "status": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}
