use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::session::{AuthSession, MaybeUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::repo::{Material, MaterialFields};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialRequest {
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub purchase_url: Option<String>,
    pub price: Option<f64>,
    pub is_wishlist: Option<bool>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_purchased: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub purchase_url: Option<String>,
    pub price: Option<f64>,
    pub is_wishlist: Option<bool>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_purchased: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchImportRequest {
    pub materials: Vec<CreateMaterialRequest>,
}

impl CreateMaterialRequest {
    fn fields(&self) -> MaterialFields<'_> {
        MaterialFields {
            name: &self.name,
            category: &self.category,
            brand: self.brand.as_deref(),
            color: self.color.as_deref(),
            quantity: self.quantity,
            unit: self.unit.as_deref(),
            min_quantity: self.min_quantity,
            purchase_url: self.purchase_url.as_deref(),
            price: self.price,
            is_wishlist: self.is_wishlist,
            notes: self.notes.as_deref(),
            last_purchased: self.last_purchased,
        }
    }
}

pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route(
            "/materials/:id",
            axum::routing::patch(update_material).delete(remove_material),
        )
        .route("/materials/import", post(batch_import))
}

#[instrument(skip(state, user))]
async fn list_materials(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<Material>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };
    let materials = Material::list_by_user(&state.db, user.id).await?;
    Ok(Json(materials))
}

#[instrument(skip(state, auth, payload))]
async fn create_material(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<CreateMaterialRequest>,
) -> Result<Json<Material>, ApiError> {
    let material = Material::create(&state.db, auth.user.id, &payload.fields()).await?;
    Ok(Json(material))
}

#[instrument(skip(state, auth, payload))]
async fn update_material(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialRequest>,
) -> Result<Json<Material>, ApiError> {
    let fields = MaterialFields {
        brand: payload.brand.as_deref(),
        color: payload.color.as_deref(),
        quantity: payload.quantity,
        unit: payload.unit.as_deref(),
        min_quantity: payload.min_quantity,
        purchase_url: payload.purchase_url.as_deref(),
        price: payload.price,
        is_wishlist: payload.is_wishlist,
        notes: payload.notes.as_deref(),
        last_purchased: payload.last_purchased,
        ..MaterialFields::default()
    };
    let material = Material::update_owned(
        &state.db,
        auth.user.id,
        id,
        payload.name.as_deref(),
        payload.category.as_deref(),
        &fields,
    )
    .await?
    .ok_or(ApiError::NotFound("Material"))?;
    Ok(Json(material))
}

#[instrument(skip(state, auth))]
async fn remove_material(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = Material::delete_owned(&state.db, auth.user.id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Material"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, auth, payload))]
async fn batch_import(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<BatchImportRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut imported = 0usize;
    for item in &payload.materials {
        Material::create(&state.db, auth.user.id, &item.fields()).await?;
        imported += 1;
    }
    Ok(Json(json!({ "imported": imported })))
}
