use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::session::{AuthSession, MaybeUser},
    error::ApiError,
    state::AppState,
};

use super::repo::Artwork;

const IMAGE_URL_TTL_SECS: u64 = 600;

pub fn artwork_routes() -> Router<AppState> {
    Router::new()
        .route("/artworks", get(list_artworks).post(create_artwork))
        .route(
            "/artworks/:id",
            patch(update_artwork).delete(delete_artwork),
        )
        .route("/artworks/import", post(batch_import))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkFields {
    pub title: String,
    pub medium: String,
    pub year_completed: Option<i32>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub storage_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub high_res_url: Option<String>,
    pub archived: Option<bool>,
    pub dimensions: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtworkRequest {
    pub title: Option<String>,
    pub medium: Option<String>,
    pub year_completed: Option<i32>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub storage_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub high_res_url: Option<String>,
    pub archived: Option<bool>,
    pub dimensions: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchImportRequest {
    pub artworks: Vec<ArtworkFields>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkView {
    pub id: Uuid,
    pub title: String,
    pub medium: String,
    pub year_completed: Option<i32>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub storage_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub high_res_url: Option<String>,
    pub archived: bool,
    pub dimensions: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Uploaded images win over legacy external URLs: a stored key resolves to a
/// fresh presigned URL for both thumbnail and high-res.
async fn artwork_view(state: &AppState, artwork: Artwork) -> ArtworkView {
    let mut thumbnail_url = artwork.thumbnail_url;
    let mut high_res_url = artwork.high_res_url;
    if let Some(key) = artwork.storage_key.as_deref() {
        match state.storage.presign_get(key, IMAGE_URL_TTL_SECS).await {
            Ok(url) => {
                thumbnail_url = Some(url.clone());
                high_res_url = Some(url);
            }
            Err(e) => warn!(error = %e, key, "presign artwork image failed"),
        }
    }
    ArtworkView {
        id: artwork.id,
        title: artwork.title,
        medium: artwork.medium,
        year_completed: artwork.year_completed,
        price: artwork.price,
        location: artwork.location,
        storage_key: artwork.storage_key,
        thumbnail_url,
        high_res_url,
        archived: artwork.archived,
        dimensions: artwork.dimensions,
        notes: artwork.notes,
        created_at: artwork.created_at,
    }
}

#[instrument(skip(state, user))]
async fn list_artworks(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<ArtworkView>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(vec![]));
    };
    let rows = Artwork::list_by_user(&state.db, user.id).await?;
    let mut views = Vec::with_capacity(rows.len());
    for artwork in rows {
        views.push(artwork_view(&state, artwork).await);
    }
    Ok(Json(views))
}

#[instrument(skip(state, auth, payload))]
async fn create_artwork(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<ArtworkFields>,
) -> Result<Json<ArtworkView>, ApiError> {
    let artwork = Artwork::create(&state.db, auth.user.id, &payload).await?;
    Ok(Json(artwork_view(&state, artwork).await))
}

#[instrument(skip(state, auth, payload))]
async fn update_artwork(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArtworkRequest>,
) -> Result<Json<ArtworkView>, ApiError> {
    let artwork = Artwork::update_owned(&state.db, auth.user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Artwork"))?;
    Ok(Json(artwork_view(&state, artwork).await))
}

#[instrument(skip(state, auth))]
async fn delete_artwork(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Artwork::delete_owned(&state.db, auth.user.id, id).await? {
        return Err(ApiError::NotFound("Artwork"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth, payload))]
async fn batch_import(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<BatchImportRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut imported = 0usize;
    for fields in &payload.artworks {
        Artwork::create(&state.db, auth.user.id, fields).await?;
        imported += 1;
    }
    Ok(Json(json!({ "imported": imported })))
}
