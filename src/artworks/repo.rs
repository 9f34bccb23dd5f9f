use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::handlers::{ArtworkFields, UpdateArtworkRequest};

/// Finished-inventory record. Carries either an uploaded image under
/// `storage_key` or external URLs from a legacy import.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Artwork {
    pub id: Uuid,
    pub user_id: Uuid,
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

const COLUMNS: &str = "id, user_id, title, medium, year_completed, price, location, \
     storage_key, thumbnail_url, high_res_url, archived, dimensions, notes, created_at";

impl Artwork {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Artwork>> {
        let rows = sqlx::query_as::<_, Artwork>(&format!(
            "SELECT {COLUMNS} FROM artworks WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        f: &ArtworkFields,
    ) -> anyhow::Result<Artwork> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            "INSERT INTO artworks
                 (user_id, title, medium, year_completed, price, location, storage_key,
                  thumbnail_url, high_res_url, archived, dimensions, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, FALSE), $11, $12)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&f.title)
        .bind(&f.medium)
        .bind(f.year_completed)
        .bind(f.price)
        .bind(f.location.as_deref())
        .bind(f.storage_key.as_deref())
        .bind(f.thumbnail_url.as_deref())
        .bind(f.high_res_url.as_deref())
        .bind(f.archived)
        .bind(f.dimensions.as_deref())
        .bind(f.notes.as_deref())
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        f: &UpdateArtworkRequest,
    ) -> anyhow::Result<Option<Artwork>> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            "UPDATE artworks SET
                 title = COALESCE($3, title),
                 medium = COALESCE($4, medium),
                 year_completed = COALESCE($5, year_completed),
                 price = COALESCE($6, price),
                 location = COALESCE($7, location),
                 storage_key = COALESCE($8, storage_key),
                 thumbnail_url = COALESCE($9, thumbnail_url),
                 high_res_url = COALESCE($10, high_res_url),
                 archived = COALESCE($11, archived),
                 dimensions = COALESCE($12, dimensions),
                 notes = COALESCE($13, notes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(f.title.as_deref())
        .bind(f.medium.as_deref())
        .bind(f.year_completed)
        .bind(f.price)
        .bind(f.location.as_deref())
        .bind(f.storage_key.as_deref())
        .bind(f.thumbnail_url.as_deref())
        .bind(f.high_res_url.as_deref())
        .bind(f.archived)
        .bind(f.dimensions.as_deref())
        .bind(f.notes.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
