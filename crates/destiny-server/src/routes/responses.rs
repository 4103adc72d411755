use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use destiny_core::responses::ResponseStore;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::AppState;

fn store(app: &AppState) -> ResponseStore {
    ResponseStore::new(app.config.responses_path(&app.root))
}

/// GET /api/responses: every stored response, oldest first.
pub async fn list_responses(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    let store = store(&app);
    let result = tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .map_err(|e| {
            tracing::error!(error = %e, "reading responses failed");
            AppError::internal("Failed to read responses")
        })?;
    Ok(Json(serde_json::json!(result)))
}

/// POST /api/responses: store a birth record, extra fields included.
pub async fn create_response(
    State(app): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = store(&app);
    let stored = tokio::task::spawn_blocking(move || store.append(body))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .map_err(|e| {
            tracing::error!(error = %e, "saving response failed");
            AppError::internal("Failed to save response")
        })?;
    Ok((StatusCode::CREATED, Json(serde_json::json!(stored))))
}
