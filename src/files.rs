use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::session::AuthSession;
use crate::error::ApiError;
use crate::state::AppState;

const UPLOAD_URL_TTL_SECS: u64 = 900;
const DOWNLOAD_URL_TTL_SECS: u64 = 600;

pub fn file_routes() -> Router<AppState> {
    // Object keys contain slashes, so the key is a trailing wildcard.
    Router::new()
        .route("/files/upload-url", post(upload_url))
        .route("/files/url/*key", get(download_url))
        .route("/files/*key", axum::routing::delete(delete_file))
}

/// Issues a presigned PUT URL; the client uploads the blob directly and then
/// stores the returned key on the owning record.
#[instrument(skip(state, auth))]
async fn upload_url(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let key = format!("uploads/{}/{}", auth.user.id, Uuid::new_v4());
    let url = state.storage.presign_put(&key, UPLOAD_URL_TTL_SECS).await?;
    Ok(Json(json!({ "key": key, "url": url })))
}

#[instrument(skip(state))]
async fn download_url(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let url = state
        .storage
        .presign_get(&key, DOWNLOAD_URL_TTL_SECS)
        .await?;
    Ok(Json(json!({ "url": url })))
}

#[instrument(skip(state, _auth))]
async fn delete_file(
    State(state): State<AppState>,
    _auth: AuthSession,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.storage.delete_object(&key).await?;
    Ok(Json(json!({ "success": true })))
}
