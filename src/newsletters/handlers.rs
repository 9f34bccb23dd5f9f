use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::session::{AuthSession, MaybeUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::repo::Newsletter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNewsletterRequest {
    pub id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub recipient_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchImportRequest {
    pub newsletters: Vec<SaveNewsletterRequest>,
}

pub fn newsletter_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletters", get(list_newsletters).post(save_newsletter))
        .route("/newsletters/:id", delete(remove_newsletter))
        .route("/newsletters/:id/sent", post(mark_sent))
        .route("/newsletters/import", post(batch_import))
}

#[instrument(skip(state, user))]
async fn list_newsletters(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<Newsletter>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };
    let newsletters = Newsletter::list_by_user(&state.db, user.id).await?;
    Ok(Json(newsletters))
}

/// Upserts a draft: with an `id` it updates the caller's existing
/// newsletter, without one it creates a new draft.
#[instrument(skip(state, auth, payload))]
async fn save_newsletter(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<SaveNewsletterRequest>,
) -> Result<Json<Newsletter>, ApiError> {
    let newsletter = match payload.id {
        Some(id) => Newsletter::update_owned(
            &state.db,
            auth.user.id,
            id,
            &payload.subject,
            &payload.body,
            &payload.recipient_ids,
        )
        .await?
        .ok_or(ApiError::NotFound("Newsletter"))?,
        None => {
            Newsletter::create(
                &state.db,
                auth.user.id,
                &payload.subject,
                &payload.body,
                &payload.recipient_ids,
            )
            .await?
        }
    };
    Ok(Json(newsletter))
}

#[instrument(skip(state, auth))]
async fn remove_newsletter(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = Newsletter::delete_owned(&state.db, auth.user.id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Newsletter"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth))]
async fn mark_sent(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Newsletter>, ApiError> {
    let newsletter = Newsletter::mark_sent_owned(&state.db, auth.user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Newsletter"))?;
    Ok(Json(newsletter))
}

#[instrument(skip(state, auth, payload))]
async fn batch_import(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<BatchImportRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut imported = 0usize;
    for item in &payload.newsletters {
        Newsletter::create(
            &state.db,
            auth.user.id,
            &item.subject,
            &item.body,
            &item.recipient_ids,
        )
        .await?;
        imported += 1;
    }
    Ok(Json(json!({ "imported": imported })))
}
