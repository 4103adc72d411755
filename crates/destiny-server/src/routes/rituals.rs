//! Ritual sessions: the input wizard driven over HTTP.
//!
//! Each session is a [`Ritual`] held in memory under a random id. Blocked
//! advances are not errors; the response reports `"advanced": false` and the
//! unchanged step.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use destiny_core::birth::BirthPatch;
use destiny_core::fortune::StdSource;
use destiny_core::ritual::{Phase, Progress, Ritual};
use destiny_core::share::share_text;
use destiny_core::wizard::{Retreat, WizardStep};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

fn ritual_to_json(app: &AppState, id: Uuid, ritual: &Ritual<StdSource>) -> Value {
    let mut view = serde_json::json!({
        "id": id,
        "phase": ritual.phase().as_str(),
        "totalSteps": WizardStep::count(),
    });
    match ritual.phase() {
        Phase::Landing => {}
        Phase::Wizard(w) => {
            let step = w.step();
            view["step"] = serde_json::json!(step);
            view["stepIndex"] = serde_json::json!(step.index());
            view["title"] = serde_json::json!(step.title());
            view["titleKo"] = serde_json::json!(step.title_ko());
            view["direction"] = serde_json::json!(w.direction());
            view["canAdvance"] = serde_json::json!(w.can_advance());
            view["data"] = serde_json::json!(w.data());
        }
        Phase::Result(record) => {
            let assets = app.config.assets_path(&app.root);
            view["data"] = serde_json::json!(record.birth);
            view["outcome"] = serde_json::json!(record.outcome);
            view["portrait"] = serde_json::json!(record.outcome.character.portrait(&assets));
            view["shareText"] =
                serde_json::json!(share_text(&record.outcome, app.config.share_origin()));
        }
    }
    view
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("ritual '{id}' not found"))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/rituals: start a session straight into the wizard.
pub async fn create_ritual(State(app): State<AppState>) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4();
    let mut ritual = app.new_ritual();
    ritual.begin();
    let view = ritual_to_json(&app, id, &ritual);
    app.rituals.lock().await.insert(id, ritual);
    tracing::debug!(%id, "ritual started");
    (StatusCode::CREATED, Json(view))
}

/// GET /api/rituals/{id}
pub async fn get_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut rituals = app.rituals.lock().await;
    let ritual = rituals.get_mut(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(ritual_to_json(&app, id, ritual)))
}

/// DELETE /api/rituals/{id}
pub async fn delete_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if app.rituals.lock().await.remove(&id).is_none() {
        return Err(not_found(id));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ---------------------------------------------------------------------------
// Wizard controls
// ---------------------------------------------------------------------------

/// PATCH /api/rituals/{id}: merge a partial birth record.
pub async fn update_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BirthPatch>,
) -> Result<Json<Value>, AppError> {
    if patch.is_empty() {
        return Err(AppError::bad_request("patch has no fields to apply"));
    }
    let mut rituals = app.rituals.lock().await;
    let ritual = rituals.get_mut(&id).ok_or_else(|| not_found(id))?;
    if !ritual.update(patch) {
        return Err(AppError::conflict(format!(
            "ritual '{id}' is not collecting input ({})",
            ritual.phase().as_str()
        )));
    }
    Ok(Json(ritual_to_json(&app, id, ritual)))
}

/// POST /api/rituals/{id}/advance: also the Enter-key accelerator.
pub async fn advance_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut rituals = app.rituals.lock().await;
    let ritual = rituals.get_mut(&id).ok_or_else(|| not_found(id))?;
    let progress = ritual.activate();
    let (label, advanced) = match progress {
        Progress::Moved(_) => ("moved", true),
        Progress::Blocked(_) => ("blocked", false),
        Progress::Completed => ("completed", true),
        Progress::Ignored => ("ignored", false),
    };
    let mut view = ritual_to_json(&app, id, ritual);
    view["progress"] = serde_json::json!(label);
    view["advanced"] = serde_json::json!(advanced);
    Ok(Json(view))
}

/// POST /api/rituals/{id}/retreat: stepping back from the first step
/// returns the session to landing.
pub async fn retreat_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut rituals = app.rituals.lock().await;
    let ritual = rituals.get_mut(&id).ok_or_else(|| not_found(id))?;
    let retreat = ritual.retreat();
    let mut view = ritual_to_json(&app, id, ritual);
    view["aborted"] = serde_json::json!(retreat == Some(Retreat::Aborted));
    Ok(Json(view))
}

/// POST /api/rituals/{id}/begin: leave landing for a fresh wizard.
pub async fn begin_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut rituals = app.rituals.lock().await;
    let ritual = rituals.get_mut(&id).ok_or_else(|| not_found(id))?;
    if !ritual.begin() {
        return Err(AppError::conflict(format!(
            "ritual '{id}' is not on the landing page ({})",
            ritual.phase().as_str()
        )));
    }
    Ok(Json(ritual_to_json(&app, id, ritual)))
}

/// POST /api/rituals/{id}/restart: back to landing.
pub async fn restart_ritual(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut rituals = app.rituals.lock().await;
    let ritual = rituals.get_mut(&id).ok_or_else(|| not_found(id))?;
    ritual.restart();
    Ok(Json(ritual_to_json(&app, id, ritual)))
}
