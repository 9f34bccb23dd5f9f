use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::auth::session::{AuthSession, MaybeUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::repo::{Piece, PieceImage, PieceNote};

const IMAGE_URL_TTL_SECS: u64 = 600;

pub fn piece_routes() -> Router<AppState> {
    Router::new()
        .route("/pieces", get(list_pieces).post(create_piece))
        .route("/pieces/:id", patch(update_piece).delete(delete_piece))
        .route("/pieces/:id/notes", post(add_note))
        .route(
            "/pieces/notes/:note_id",
            patch(update_note).delete(delete_note),
        )
        .route("/pieces/:id/images", post(add_image))
        .route("/pieces/images/:image_id", delete(delete_image))
        .route("/pieces/import", post(batch_import))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePieceRequest {
    pub title: String,
    pub deadline: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePieceRequest {
    pub title: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub storage_key: Option<String>,
    pub url: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPiece {
    pub title: String,
    pub deadline: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub notes: Vec<NoteRequest>,
    #[serde(default)]
    pub images: Vec<ImageRequest>,
}

#[derive(Debug, Deserialize)]
pub struct BatchImportRequest {
    pub pieces: Vec<ImportPiece>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: Uuid,
    pub piece_id: Uuid,
    pub storage_key: Option<String>,
    pub url: Option<String>,
    pub caption: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceView {
    #[serde(flatten)]
    pub piece: Piece,
    pub notes: Vec<PieceNote>,
    pub images: Vec<ImageView>,
}

async fn image_view(state: &AppState, image: PieceImage) -> ImageView {
    let mut url = image.url;
    if let Some(key) = image.storage_key.as_deref() {
        match state.storage.presign_get(key, IMAGE_URL_TTL_SECS).await {
            Ok(presigned) => url = Some(presigned),
            Err(e) => warn!(error = %e, key, "presign piece image failed"),
        }
    }
    ImageView {
        id: image.id,
        piece_id: image.piece_id,
        storage_key: image.storage_key,
        url,
        caption: image.caption,
        created_at: image.created_at,
    }
}

#[instrument(skip(state, user))]
async fn list_pieces(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<PieceView>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(vec![]));
    };
    let pieces = Piece::list_by_user(&state.db, user.id).await?;
    let notes = PieceNote::list_for_user_pieces(&state.db, user.id).await?;
    let images = PieceImage::list_for_user_pieces(&state.db, user.id).await?;

    let mut notes_by_piece: HashMap<Uuid, Vec<PieceNote>> = HashMap::new();
    for note in notes {
        notes_by_piece.entry(note.piece_id).or_default().push(note);
    }
    let mut images_by_piece: HashMap<Uuid, Vec<ImageView>> = HashMap::new();
    for image in images {
        let view = image_view(&state, image).await;
        images_by_piece.entry(view.piece_id).or_default().push(view);
    }

    let views = pieces
        .into_iter()
        .map(|piece| PieceView {
            notes: notes_by_piece.remove(&piece.id).unwrap_or_default(),
            images: images_by_piece.remove(&piece.id).unwrap_or_default(),
            piece,
        })
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state, auth, payload))]
async fn create_piece(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<CreatePieceRequest>,
) -> Result<Json<Piece>, ApiError> {
    let piece = Piece::create(
        &state.db,
        auth.user.id,
        &payload.title,
        payload.deadline.as_deref(),
        payload.status.as_deref(),
        payload.kind.as_deref(),
    )
    .await?;
    Ok(Json(piece))
}

#[instrument(skip(state, auth, payload))]
async fn update_piece(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePieceRequest>,
) -> Result<Json<Piece>, ApiError> {
    let piece = Piece::update_owned(
        &state.db,
        auth.user.id,
        id,
        payload.title.as_deref(),
        payload.deadline.as_deref(),
        payload.status.as_deref(),
        payload.kind.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("Piece"))?;
    Ok(Json(piece))
}

#[instrument(skip(state, auth))]
async fn delete_piece(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Piece::delete_owned(&state.db, auth.user.id, id).await? {
        return Err(ApiError::NotFound("Piece"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth, payload))]
async fn add_note(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<PieceNote>, ApiError> {
    Piece::find_owned(&state.db, auth.user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Piece"))?;
    let note = PieceNote::create(&state.db, auth.user.id, id, &payload.text).await?;
    Ok(Json(note))
}

#[instrument(skip(state, auth, payload))]
async fn update_note(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(note_id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<PieceNote>, ApiError> {
    let note = PieceNote::update_owned(&state.db, auth.user.id, note_id, &payload.text)
        .await?
        .ok_or(ApiError::NotFound("Note"))?;
    Ok(Json(note))
}

#[instrument(skip(state, auth))]
async fn delete_note(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !PieceNote::delete_owned(&state.db, auth.user.id, note_id).await? {
        return Err(ApiError::NotFound("Note"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth, payload))]
async fn add_image(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<ImageView>, ApiError> {
    if payload.storage_key.is_none() && payload.url.is_none() {
        return Err(ApiError::validation("Either storageKey or url is required"));
    }
    Piece::find_owned(&state.db, auth.user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Piece"))?;
    let image = PieceImage::create(
        &state.db,
        auth.user.id,
        id,
        payload.storage_key.as_deref(),
        payload.url.as_deref(),
        payload.caption.as_deref(),
    )
    .await?;
    Ok(Json(image_view(&state, image).await))
}

#[instrument(skip(state, auth))]
async fn delete_image(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(image_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !PieceImage::delete_owned(&state.db, auth.user.id, image_id).await? {
        return Err(ApiError::NotFound("Image"));
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
    for item in &payload.pieces {
        let piece = Piece::create(
            &state.db,
            auth.user.id,
            &item.title,
            item.deadline.as_deref(),
            item.status.as_deref(),
            item.kind.as_deref(),
        )
        .await?;
        for note in &item.notes {
            PieceNote::create(&state.db, auth.user.id, piece.id, &note.text).await?;
        }
        for image in &item.images {
            if image.storage_key.is_none() && image.url.is_none() {
                continue;
            }
            PieceImage::create(
                &state.db,
                auth.user.id,
                piece.id,
                image.storage_key.as_deref(),
                image.url.as_deref(),
                image.caption.as_deref(),
            )
            .await?;
        }
        imported += 1;
    }
    Ok(Json(json!({ "imported": imported })))
}
