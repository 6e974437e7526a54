//! Burned-Area Prediction API Server
//!
//! HTTP front end over the inference engine: health, schema and prediction
//! endpoints plus Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_engine::InferenceEngine;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod dataset;
mod routes;

pub use crate::config::{load_config, ServerConfig};
pub use routes::predictions::{ApiError, PredictResponse};

/// Label column present in dataset rows; never a model input
pub const LABEL_FIELD: &str = "area";

/// Application state shared across handlers
pub struct AppState {
    /// Loaded scaler + model, read-only for the process lifetime
    pub engine: InferenceEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus renderer, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: InferenceEngine, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelStatus,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub path: String,
    pub schema_version: u32,
    pub feature_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/schema", get(routes::schema::get_schema))
        .route("/api/v1/predict", post(routes::predictions::predict))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelStatus {
            path: state.engine.model_path().to_string(),
            schema_version: state.engine.schema().version,
            feature_count: state.engine.columns().len(),
        },
    };

    Json(response)
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Logging setup failures
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level {0:?}: expected trace, debug, info, warn or error")]
    InvalidLevel(String),
    #[error(transparent)]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Parse a configured log level name
pub fn parse_log_level(level: &str) -> Result<Level, LoggingError> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// Initialize logging
pub fn init_logging(level: &str, json: bool) -> Result<(), LoggingError> {
    let level = parse_log_level(level)?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Load the artifact and run the server until it exits
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Without a valid artifact the process must not serve predictions.
    let engine = InferenceEngine::load(&config.artifact_path)?;

    let metrics = if config.enable_metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    let state = Arc::new(AppState::new(engine, metrics));
    let app = create_router(state);

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    pub(crate) fn test_state() -> Arc<AppState> {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../models/forest_fires_gbr.json");
        let engine = InferenceEngine::load(path).unwrap();
        Arc::new(AppState::new(engine, None))
    }

    pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"]["feature_count"], 29);
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert!(matches!(
            parse_log_level("verbose"),
            Err(LoggingError::InvalidLevel(ref name)) if name == "verbose"
        ));
    }

    #[test]
    fn test_misspelled_level_fails_before_installing() {
        assert!(matches!(
            init_logging("inf", false),
            Err(LoggingError::InvalidLevel(_))
        ));
    }
}
