//! Schema Routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Column layout the loaded model was fitted on
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub version: u32,
    pub numeric_columns: Vec<String>,
    pub columns: Vec<String>,
    pub width: usize,
}

/// Get the feature schema of the loaded model
pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    let schema = state.engine.schema();

    Json(SchemaResponse {
        version: schema.version,
        numeric_columns: schema.numeric_columns.clone(),
        columns: state.engine.columns().to_vec(),
        width: schema.width(),
    })
}
