use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::handlers::{CollectorFields, UpdateCollectorRequest};

/// Contact-book entry: collectors, galleries, curators, press.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Collector {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str =
    "id, user_id, name, email, phone, category, notes, last_contacted_at, created_at";

impl Collector {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Collector>> {
        let rows = sqlx::query_as::<_, Collector>(&format!(
            "SELECT {COLUMNS} FROM collectors WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        f: &CollectorFields,
    ) -> anyhow::Result<Collector> {
        let row = sqlx::query_as::<_, Collector>(&format!(
            "INSERT INTO collectors (user_id, name, email, phone, category, notes, last_contacted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&f.name)
        .bind(f.email.as_deref())
        .bind(f.phone.as_deref())
        .bind(f.category.as_deref())
        .bind(f.notes.as_deref())
        .bind(f.last_contacted_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        f: &UpdateCollectorRequest,
    ) -> anyhow::Result<Option<Collector>> {
        let row = sqlx::query_as::<_, Collector>(&format!(
            "UPDATE collectors SET
                 name = COALESCE($3, name),
                 email = COALESCE($4, email),
                 phone = COALESCE($5, phone),
                 category = COALESCE($6, category),
                 notes = COALESCE($7, notes),
                 last_contacted_at = COALESCE($8, last_contacted_at)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(f.name.as_deref())
        .bind(f.email.as_deref())
        .bind(f.phone.as_deref())
        .bind(f.category.as_deref())
        .bind(f.notes.as_deref())
        .bind(f.last_contacted_at)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM collectors WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_contacted(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Collector>> {
        let row = sqlx::query_as::<_, Collector>(&format!(
            "UPDATE collectors SET last_contacted_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
