use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub deadline: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PieceNote {
    pub id: Uuid,
    pub piece_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PieceImage {
    pub id: Uuid,
    pub piece_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub storage_key: Option<String>,
    pub url: Option<String>,
    pub caption: Option<String>,
    pub created_at: OffsetDateTime,
}

const PIECE_COLUMNS: &str = "id, user_id, title, deadline, status, kind, created_at";
const NOTE_COLUMNS: &str = "id, piece_id, user_id, text, created_at";
const IMAGE_COLUMNS: &str = "id, piece_id, user_id, storage_key, url, caption, created_at";

impl Piece {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Piece>> {
        let rows = sqlx::query_as::<_, Piece>(&format!(
            "SELECT {PIECE_COLUMNS} FROM pieces WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Piece>> {
        let row = sqlx::query_as::<_, Piece>(&format!(
            "SELECT {PIECE_COLUMNS} FROM pieces WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        deadline: Option<&str>,
        status: Option<&str>,
        kind: Option<&str>,
    ) -> anyhow::Result<Piece> {
        let row = sqlx::query_as::<_, Piece>(&format!(
            "INSERT INTO pieces (user_id, title, deadline, status, kind)
             VALUES ($1, $2, $3, COALESCE($4, 'not-started'), $5)
             RETURNING {PIECE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(title)
        .bind(deadline)
        .bind(status)
        .bind(kind)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        title: Option<&str>,
        deadline: Option<&str>,
        status: Option<&str>,
        kind: Option<&str>,
    ) -> anyhow::Result<Option<Piece>> {
        let row = sqlx::query_as::<_, Piece>(&format!(
            "UPDATE pieces
             SET title    = COALESCE($3, title),
                 deadline = COALESCE($4, deadline),
                 status   = COALESCE($5, status),
                 kind     = COALESCE($6, kind)
             WHERE id = $1 AND user_id = $2
             RETURNING {PIECE_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(deadline)
        .bind(status)
        .bind(kind)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Notes and images go with the piece via FK cascade.
    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM pieces WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PieceNote {
    pub async fn list_for_user_pieces(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<PieceNote>> {
        let rows = sqlx::query_as::<_, PieceNote>(&format!(
            "SELECT {NOTE_COLUMNS} FROM piece_notes WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        piece_id: Uuid,
        text: &str,
    ) -> anyhow::Result<PieceNote> {
        let row = sqlx::query_as::<_, PieceNote>(&format!(
            "INSERT INTO piece_notes (piece_id, user_id, text)
             VALUES ($1, $2, $3)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(piece_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        text: &str,
    ) -> anyhow::Result<Option<PieceNote>> {
        let row = sqlx::query_as::<_, PieceNote>(&format!(
            "UPDATE piece_notes SET text = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(text)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM piece_notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PieceImage {
    pub async fn list_for_user_pieces(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<PieceImage>> {
        let rows = sqlx::query_as::<_, PieceImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM piece_images WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        piece_id: Uuid,
        storage_key: Option<&str>,
        url: Option<&str>,
        caption: Option<&str>,
    ) -> anyhow::Result<PieceImage> {
        let row = sqlx::query_as::<_, PieceImage>(&format!(
            "INSERT INTO piece_images (piece_id, user_id, storage_key, url, caption)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(piece_id)
        .bind(user_id)
        .bind(storage_key)
        .bind(url)
        .bind(caption)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM piece_images WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
