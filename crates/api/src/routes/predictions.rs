//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_engine::RawRecord;
use inference_engine::InferenceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{AppState, LABEL_FIELD};

/// Response for the predict endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub burned_area: f64,
    pub range_warnings: Vec<String>,
    pub latency_us: u64,
    pub schema_version: u32,
}

/// Error body returned to clients
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

/// Request failure, mapped onto an HTTP status
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be read as a JSON record
    #[error("Invalid request body: {message}")]
    BadRequest { status: StatusCode, message: String },
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest { status, .. } => (*status, "invalid_record"),
            ApiError::Inference(InferenceError::Validation(e)) if e.is_schema_error() => {
                (StatusCode::UNPROCESSABLE_ENTITY, "schema_mismatch")
            }
            ApiError::Inference(InferenceError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_record")
            }
            ApiError::Inference(InferenceError::InvalidInputShape { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "invalid_shape")
            }
            ApiError::Inference(InferenceError::PredictionFailed(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "prediction_failed")
            }
            ApiError::Inference(InferenceError::ArtifactLoad(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "artifact")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            error!("Prediction request failed: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

/// Predict burned area for one observation
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(record) = payload.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        metrics::counter!("prediction_errors_total").increment(1);
        ApiError::from(rejection)
    })?;
    let record = record.without(LABEL_FIELD);

    let result = state.engine.predict_record(&record).map_err(|e| {
        metrics::counter!("prediction_errors_total").increment(1);
        ApiError::from(e)
    })?;

    metrics::counter!("predictions_total").increment(1);
    metrics::histogram!("prediction_latency_seconds").record(result.latency_us as f64 / 1e6);
    debug!("Served prediction {:.4}", result.prediction.burned_area);

    Ok(Json(PredictResponse {
        burned_area: result.prediction.burned_area,
        range_warnings: result.prediction.range_warnings,
        latency_us: result.latency_us,
        schema_version: state.engine.schema().version,
    }))
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use crate::tests::{body_json, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn post(body: serde_json::Value) -> Request<Body> {
        Request::post("/api/v1/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn row() -> serde_json::Value {
        json!({
            "X": 7, "Y": 5, "FFMC": 86.2, "DMC": 26.2, "DC": 94.3, "ISI": 5.1,
            "temp": 8.2, "RH": 51, "wind": 6.7, "rain": 0.0,
            "month": "mar", "day": "fri"
        })
    }

    #[tokio::test]
    async fn test_predict_valid_row() {
        let app = create_router(test_state());
        let response = app.oneshot(post(row())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let area = body["burned_area"].as_f64().unwrap();
        assert!(area.is_finite());
        assert_eq!(body["schema_version"], 1);
    }

    #[tokio::test]
    async fn test_label_column_ignored() {
        let state = test_state();
        let mut with_label = row();
        with_label["area"] = json!(12.5);

        let plain = body_json(
            create_router(state.clone())
                .oneshot(post(row()))
                .await
                .unwrap(),
        )
        .await;
        let labelled = body_json(create_router(state).oneshot(post(with_label)).await.unwrap()).await;

        assert_eq!(plain["burned_area"], labelled["burned_area"]);
    }

    #[tokio::test]
    async fn test_unknown_month_is_422() {
        let mut bad = row();
        bad["month"] = json!("xyz");

        let response = create_router(test_state()).oneshot(post(bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "invalid_record");
    }

    #[tokio::test]
    async fn test_null_field_gets_json_error_body() {
        let mut bad = row();
        bad["X"] = serde_json::Value::Null;

        let response = create_router(test_state()).oneshot(post(bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "invalid_record");
        assert!(body["error"].as_str().unwrap().contains("X"));
    }

    #[tokio::test]
    async fn test_malformed_json_gets_json_error_body() {
        let request = Request::post("/api/v1/predict")
            .header("content-type", "application/json")
            .body(Body::from("{\"X\": 7,"))
            .unwrap();

        let response = create_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "invalid_record");
    }

    #[tokio::test]
    async fn test_missing_wind_is_schema_mismatch() {
        let mut bad = row();
        bad.as_object_mut().unwrap().remove("wind");

        let response = create_router(test_state()).oneshot(post(bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "schema_mismatch");
        assert!(body["error"].as_str().unwrap().contains("wind"));
    }
}
