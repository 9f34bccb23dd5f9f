use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::session::{AuthSession, MaybeUser},
    error::ApiError,
    state::AppState,
};

use super::repo::Reminder;

pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/reminders", get(list_reminders).post(create_reminder))
        .route(
            "/reminders/:id",
            patch(update_reminder).delete(delete_reminder),
        )
        .route("/reminders/:id/complete", post(complete_reminder))
        .route("/reminders/import", post(batch_import))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderFields {
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub collector_ids: Option<Vec<String>>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub collector_ids: Option<Vec<String>>,
    pub completed: Option<bool>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct BatchImportRequest {
    pub reminders: Vec<ReminderFields>,
}

#[instrument(skip(state, user))]
async fn list_reminders(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(vec![]));
    };
    Ok(Json(Reminder::list_by_user(&state.db, user.id).await?))
}

#[instrument(skip(state, auth, payload))]
async fn create_reminder(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<ReminderFields>,
) -> Result<Json<Reminder>, ApiError> {
    Ok(Json(
        Reminder::create(&state.db, auth.user.id, &payload).await?,
    ))
}

#[instrument(skip(state, auth, payload))]
async fn update_reminder(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReminderRequest>,
) -> Result<Json<Reminder>, ApiError> {
    let reminder = Reminder::update_owned(&state.db, auth.user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Reminder"))?;
    Ok(Json(reminder))
}

#[instrument(skip(state, auth))]
async fn delete_reminder(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Reminder::delete_owned(&state.db, auth.user.id, id).await? {
        return Err(ApiError::NotFound("Reminder"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth))]
async fn complete_reminder(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Reminder>, ApiError> {
    let reminder = Reminder::complete_owned(&state.db, auth.user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Reminder"))?;
    Ok(Json(reminder))
}

#[instrument(skip(state, auth, payload))]
async fn batch_import(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<BatchImportRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut imported = 0usize;
    for fields in &payload.reminders {
        Reminder::create(&state.db, auth.user.id, fields).await?;
        imported += 1;
    }
    Ok(Json(json!({ "imported": imported })))
}
