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

use super::repo::Collector;

pub fn collector_routes() -> Router<AppState> {
    Router::new()
        .route("/collectors", get(list_collectors).post(create_collector))
        .route(
            "/collectors/:id",
            patch(update_collector).delete(delete_collector),
        )
        .route("/collectors/:id/contacted", post(mark_contacted))
        .route("/collectors/import", post(batch_import))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_contacted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_contacted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct BatchImportRequest {
    pub collectors: Vec<CollectorFields>,
}

#[instrument(skip(state, user))]
async fn list_collectors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<Collector>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(vec![]));
    };
    Ok(Json(Collector::list_by_user(&state.db, user.id).await?))
}

#[instrument(skip(state, auth, payload))]
async fn create_collector(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<CollectorFields>,
) -> Result<Json<Collector>, ApiError> {
    Ok(Json(
        Collector::create(&state.db, auth.user.id, &payload).await?,
    ))
}

#[instrument(skip(state, auth, payload))]
async fn update_collector(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCollectorRequest>,
) -> Result<Json<Collector>, ApiError> {
    let collector = Collector::update_owned(&state.db, auth.user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Collector"))?;
    Ok(Json(collector))
}

#[instrument(skip(state, auth))]
async fn delete_collector(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Collector::delete_owned(&state.db, auth.user.id, id).await? {
        return Err(ApiError::NotFound("Collector"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth))]
async fn mark_contacted(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Collector>, ApiError> {
    let collector = Collector::mark_contacted(&state.db, auth.user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Collector"))?;
    Ok(Json(collector))
}

#[instrument(skip(state, auth, payload))]
async fn batch_import(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<BatchImportRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut imported = 0usize;
    for fields in &payload.collectors {
        Collector::create(&state.db, auth.user.id, fields).await?;
        imported += 1;
    }
    Ok(Json(json!({ "imported": imported })))
}
