use axum::extract::{Path, State};
use axum::Json;
use destiny_core::fortune::{characters, find_character, Character};
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

fn character_to_json(app: &AppState, c: &Character) -> Value {
    let mut value = serde_json::json!(c);
    value["portrait"] = serde_json::json!(c.portrait(&app.config.assets_path(&app.root)));
    value
}

/// GET /api/characters: the fixed character table.
pub async fn list_characters(State(app): State<AppState>) -> Json<Value> {
    let list: Vec<Value> = characters()
        .iter()
        .map(|c| character_to_json(&app, c))
        .collect();
    Json(serde_json::json!(list))
}

/// GET /api/characters/{id}
pub async fn get_character(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let c = find_character(&id)?;
    Ok(Json(character_to_json(&app, c)))
}
