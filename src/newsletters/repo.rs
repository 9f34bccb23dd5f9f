use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
    pub recipient_ids: Vec<String>,
    pub sent_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str =
    "id, user_id, subject, body, recipient_ids, sent_at, created_at, updated_at";

impl Newsletter {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Newsletter>> {
        let rows = sqlx::query_as::<_, Newsletter>(&format!(
            "SELECT {COLUMNS} FROM newsletters WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        subject: &str,
        body: &str,
        recipient_ids: &[String],
    ) -> anyhow::Result<Newsletter> {
        let row = sqlx::query_as::<_, Newsletter>(&format!(
            "INSERT INTO newsletters (user_id, subject, body, recipient_ids)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(subject)
        .bind(body)
        .bind(recipient_ids)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        subject: &str,
        body: &str,
        recipient_ids: &[String],
    ) -> anyhow::Result<Option<Newsletter>> {
        let row = sqlx::query_as::<_, Newsletter>(&format!(
            "UPDATE newsletters
             SET subject = $3, body = $4, recipient_ids = $5, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(subject)
        .bind(body)
        .bind(recipient_ids)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM newsletters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_sent_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Newsletter>> {
        let row = sqlx::query_as::<_, Newsletter>(&format!(
            "UPDATE newsletters SET sent_at = now()
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
