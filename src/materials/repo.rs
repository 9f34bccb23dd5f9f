use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub purchase_url: Option<String>,
    pub price: Option<f64>,
    pub is_wishlist: bool,
    pub notes: Option<String>,
    pub last_purchased: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Default)]
pub struct MaterialFields<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub brand: Option<&'a str>,
    pub color: Option<&'a str>,
    pub quantity: Option<f64>,
    pub unit: Option<&'a str>,
    pub min_quantity: Option<f64>,
    pub purchase_url: Option<&'a str>,
    pub price: Option<f64>,
    pub is_wishlist: Option<bool>,
    pub notes: Option<&'a str>,
    pub last_purchased: Option<OffsetDateTime>,
}

const COLUMNS: &str = "id, user_id, name, category, brand, color, quantity, unit, \
     min_quantity, purchase_url, price, is_wishlist, notes, last_purchased, created_at";

impl Material {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Material>> {
        let rows = sqlx::query_as::<_, Material>(&format!(
            "SELECT {COLUMNS} FROM materials WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        fields: &MaterialFields<'_>,
    ) -> anyhow::Result<Material> {
        let row = sqlx::query_as::<_, Material>(&format!(
            "INSERT INTO materials (user_id, name, category, brand, color, quantity, unit,
                                    min_quantity, purchase_url, price, is_wishlist, notes,
                                    last_purchased)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7, $8, $9, $10,
                     COALESCE($11, FALSE), $12, $13)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(fields.name)
        .bind(fields.category)
        .bind(fields.brand)
        .bind(fields.color)
        .bind(fields.quantity)
        .bind(fields.unit)
        .bind(fields.min_quantity)
        .bind(fields.purchase_url)
        .bind(fields.price)
        .bind(fields.is_wishlist)
        .bind(fields.notes)
        .bind(fields.last_purchased)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Partial update, absent fields keep their stored values.
    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        category: Option<&str>,
        fields: &MaterialFields<'_>,
    ) -> anyhow::Result<Option<Material>> {
        let row = sqlx::query_as::<_, Material>(&format!(
            "UPDATE materials
             SET name           = COALESCE($3, name),
                 category       = COALESCE($4, category),
                 brand          = COALESCE($5, brand),
                 color          = COALESCE($6, color),
                 quantity       = COALESCE($7, quantity),
                 unit           = COALESCE($8, unit),
                 min_quantity   = COALESCE($9, min_quantity),
                 purchase_url   = COALESCE($10, purchase_url),
                 price          = COALESCE($11, price),
                 is_wishlist    = COALESCE($12, is_wishlist),
                 notes          = COALESCE($13, notes),
                 last_purchased = COALESCE($14, last_purchased)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(category)
        .bind(fields.brand)
        .bind(fields.color)
        .bind(fields.quantity)
        .bind(fields.unit)
        .bind(fields.min_quantity)
        .bind(fields.purchase_url)
        .bind(fields.price)
        .bind(fields.is_wishlist)
        .bind(fields.notes)
        .bind(fields.last_purchased)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
