use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use destiny_core::results::{ResultLog, ResultRow};
use serde_json::Value;

use crate::state::AppState;

/// POST /api/save-result: append one row to the CSV result log.
///
/// Always answers `{success, message}`, including on failure.
pub async fn save_result(
    State(app): State<AppState>,
    body: Result<Json<ResultRow>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let row = match body {
        Ok(Json(row)) => row,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected result payload");
            return failure(StatusCode::BAD_REQUEST);
        }
    };
    let log = ResultLog::new(app.config.results_path(&app.root));
    let outcome = tokio::task::spawn_blocking(move || log.append(&row)).await;

    match outcome {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "message": "Data saved successfully" })),
        ),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "saving result failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            tracing::error!(error = %e, "saving result task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn failure(status: StatusCode) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(serde_json::json!({ "success": false, "message": "Failed to save data" })),
    )
}
