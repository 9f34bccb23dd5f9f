use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calls::dto::{ChecklistItem, OpenCall, SaveCallStateRequest};

/// Per-user state attached to an external or custom call, keyed by the call's
/// string id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedCallState {
    pub id: Uuid,
    pub user_id: Uuid,
    pub call_id: String,
    pub bookmarked: bool,
    pub applied: bool,
    pub hidden: bool,
    pub application_status: Option<String>,
    pub checklist: Option<Json<Vec<ChecklistItem>>>,
}

impl SavedCallState {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<SavedCallState>> {
        let rows = sqlx::query_as::<_, SavedCallState>(
            r#"
            SELECT id, user_id, call_id, bookmarked, applied, hidden,
                   application_status, checklist
            FROM saved_call_states
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Upsert keyed on (user, call id); absent fields keep their stored value,
    /// first write fills unset flags with false.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        req: &SaveCallStateRequest,
    ) -> anyhow::Result<SavedCallState> {
        let row = sqlx::query_as::<_, SavedCallState>(
            r#"
            INSERT INTO saved_call_states
                (user_id, call_id, bookmarked, applied, hidden, application_status, checklist)
            VALUES ($1, $2, COALESCE($3, FALSE), COALESCE($4, FALSE), COALESCE($5, FALSE), $6, $7)
            ON CONFLICT (user_id, call_id) DO UPDATE SET
                bookmarked = COALESCE($3, saved_call_states.bookmarked),
                applied = COALESCE($4, saved_call_states.applied),
                hidden = COALESCE($5, saved_call_states.hidden),
                application_status = COALESCE($6, saved_call_states.application_status),
                checklist = COALESCE($7, saved_call_states.checklist)
            RETURNING id, user_id, call_id, bookmarked, applied, hidden,
                      application_status, checklist
            "#,
        )
        .bind(user_id)
        .bind(&req.call_id)
        .bind(req.bookmarked)
        .bind(req.applied)
        .bind(req.hidden)
        .bind(req.application_status.as_deref())
        .bind(req.checklist.as_ref().map(Json))
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}

/// User-added open call, merged into the curated listing at read time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomCall {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub entry_fee: Option<f64>,
    pub description: Option<String>,
    pub mediums: Option<Vec<String>>,
    pub theme: Option<String>,
    pub url: Option<String>,
    pub kind: Option<String>,
    pub created_at: OffsetDateTime,
}

const CUSTOM_CALL_COLUMNS: &str = "id, user_id, title, organization, location, deadline, \
     entry_fee, description, mediums, theme, url, kind, created_at";

impl CustomCall {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<CustomCall>> {
        let rows = sqlx::query_as::<_, CustomCall>(&format!(
            "SELECT {CUSTOM_CALL_COLUMNS}
             FROM custom_open_calls
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &crate::calls::dto::CustomCallRequest,
    ) -> anyhow::Result<CustomCall> {
        let row = sqlx::query_as::<_, CustomCall>(&format!(
            "INSERT INTO custom_open_calls
                 (user_id, title, organization, location, deadline, entry_fee,
                  description, mediums, theme, url, kind)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {CUSTOM_CALL_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.organization)
        .bind(req.location.as_deref())
        .bind(req.deadline.as_deref())
        .bind(req.entry_fee)
        .bind(req.description.as_deref())
        .bind(req.mediums.as_deref())
        .bind(req.theme.as_deref())
        .bind(req.url.as_deref())
        .bind(req.kind.as_deref())
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Patch fields that were provided; scoped to the owner so a foreign id
    /// behaves exactly like a missing one.
    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &crate::calls::dto::UpdateCustomCallRequest,
    ) -> anyhow::Result<Option<CustomCall>> {
        let row = sqlx::query_as::<_, CustomCall>(&format!(
            "UPDATE custom_open_calls SET
                 title = COALESCE($3, title),
                 organization = COALESCE($4, organization),
                 location = COALESCE($5, location),
                 deadline = COALESCE($6, deadline),
                 entry_fee = COALESCE($7, entry_fee),
                 description = COALESCE($8, description),
                 mediums = COALESCE($9, mediums),
                 theme = COALESCE($10, theme),
                 url = COALESCE($11, url),
                 kind = COALESCE($12, kind)
             WHERE id = $1 AND user_id = $2
             RETURNING {CUSTOM_CALL_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(req.title.as_deref())
        .bind(req.organization.as_deref())
        .bind(req.location.as_deref())
        .bind(req.deadline.as_deref())
        .bind(req.entry_fee)
        .bind(req.description.as_deref())
        .bind(req.mediums.as_deref())
        .bind(req.theme.as_deref())
        .bind(req.url.as_deref())
        .bind(req.kind.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM custom_open_calls WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl From<CustomCall> for OpenCall {
    fn from(c: CustomCall) -> Self {
        OpenCall {
            id: c.id.to_string(),
            title: c.title,
            organization: c.organization,
            location: c.location,
            deadline: c.deadline,
            entry_fee: c.entry_fee,
            description: c.description,
            mediums: c.mediums.unwrap_or_default(),
            theme: c.theme,
            eligibility: None,
            prizes: None,
            url: c.url,
            source: "Manual".into(),
            featured: false,
            kind: c.kind,
            open_date: None,
        }
    }
}
