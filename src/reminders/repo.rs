use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::handlers::{ReminderFields, UpdateReminderRequest};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub collector_ids: Vec<String>,
    pub completed: bool,
    pub completed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, title, description, due_date, collector_ids, \
     completed, completed_at, created_at";

impl Reminder {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, Reminder>(&format!(
            "SELECT {COLUMNS} FROM reminders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        f: &ReminderFields,
    ) -> anyhow::Result<Reminder> {
        let row = sqlx::query_as::<_, Reminder>(&format!(
            "INSERT INTO reminders
                 (user_id, title, description, due_date, collector_ids, completed)
             VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'), COALESCE($6, FALSE))
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&f.title)
        .bind(f.description.as_deref())
        .bind(&f.due_date)
        .bind(f.collector_ids.as_deref())
        .bind(f.completed)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        f: &UpdateReminderRequest,
    ) -> anyhow::Result<Option<Reminder>> {
        let row = sqlx::query_as::<_, Reminder>(&format!(
            "UPDATE reminders SET
                 title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 due_date = COALESCE($5, due_date),
                 collector_ids = COALESCE($6, collector_ids),
                 completed = COALESCE($7, completed),
                 completed_at = COALESCE($8, completed_at)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(f.title.as_deref())
        .bind(f.description.as_deref())
        .bind(f.due_date.as_deref())
        .bind(f.collector_ids.as_deref())
        .bind(f.completed)
        .bind(f.completed_at)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn complete_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Reminder>> {
        let row = sqlx::query_as::<_, Reminder>(&format!(
            "UPDATE reminders SET completed = TRUE, completed_at = now()
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
