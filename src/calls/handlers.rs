use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{
        dto::ArtistProfile,
        repo::User,
        session::{AuthSession, MaybeUser},
    },
    calls::{
        curated::curated_calls,
        dto::{
            CallListResponse, CustomCallRequest, EnrichedCall, OpenCall, SaveCallStateRequest,
            SavedStateView, UpdateCustomCallRequest, UpdatePreferencesRequest,
        },
        repo::{CustomCall, SavedCallState},
        scorer::score_call,
    },
    error::ApiError,
    state::AppState,
};

pub fn call_routes() -> Router<AppState> {
    Router::new()
        .route("/calls", get(list_calls))
        .route("/calls/states", get(list_saved_states).post(save_call_state))
        .route("/calls/custom", get(list_custom_calls).post(create_custom_call))
        .route("/calls/custom/:id", patch(update_custom_call))
        .route("/calls/custom/:id", delete(delete_custom_call))
        .route(
            "/calls/preferences",
            get(get_preferences).patch(update_preferences),
        )
}

fn state_view(s: SavedCallState) -> SavedStateView {
    SavedStateView {
        id: s.id,
        call_id: s.call_id,
        bookmarked: s.bookmarked,
        hidden: s.hidden,
        applied: s.applied,
        application_status: s.application_status,
        checklist: s.checklist.map(|c| c.0),
    }
}

/// Merged curated + custom listing, joined with the caller's saved state and
/// scored against their stored profile, sorted descending by score.
#[instrument(skip(state, user))]
async fn list_calls(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<CallListResponse>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let Some(user) = user else {
        return Ok(Json(CallListResponse {
            calls: vec![],
            fetched_at: now,
        }));
    };

    let prefs = user
        .artist_profile
        .map(|p| p.0)
        .unwrap_or_default();

    let mut states: HashMap<String, SavedCallState> =
        SavedCallState::list_by_user(&state.db, user.id)
            .await?
            .into_iter()
            .map(|s| (s.call_id.clone(), s))
            .collect();

    let custom: Vec<OpenCall> = CustomCall::list_by_user(&state.db, user.id)
        .await?
        .into_iter()
        .map(OpenCall::from)
        .collect();

    let mut calls: Vec<EnrichedCall> = custom
        .into_iter()
        .chain(curated_calls())
        .map(|call| {
            let saved = states.remove(&call.id);
            let recommendation = score_call(&call, &prefs, now);
            let (bookmarked, hidden, applied, application_status, checklist) = match saved {
                Some(s) => (
                    s.bookmarked,
                    s.hidden,
                    s.applied,
                    s.application_status,
                    s.checklist.map(|c| c.0),
                ),
                None => (false, false, false, None, None),
            };
            EnrichedCall {
                call,
                bookmarked,
                hidden,
                applied,
                application_status,
                checklist,
                recommendation,
            }
        })
        .collect();
    calls.sort_by(|a, b| b.recommendation.score.cmp(&a.recommendation.score));

    Ok(Json(CallListResponse {
        calls,
        fetched_at: now,
    }))
}

#[instrument(skip(state, user))]
async fn list_saved_states(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<SavedStateView>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(vec![]));
    };
    let states = SavedCallState::list_by_user(&state.db, user.id).await?;
    Ok(Json(states.into_iter().map(state_view).collect()))
}

#[instrument(skip(state, auth, payload))]
async fn save_call_state(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<SaveCallStateRequest>,
) -> Result<Json<SavedStateView>, ApiError> {
    let saved = SavedCallState::upsert(&state.db, auth.user.id, &payload).await?;
    Ok(Json(state_view(saved)))
}

#[instrument(skip(state, user))]
async fn list_custom_calls(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<OpenCall>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(vec![]));
    };
    let calls = CustomCall::list_by_user(&state.db, user.id).await?;
    Ok(Json(calls.into_iter().map(OpenCall::from).collect()))
}

#[instrument(skip(state, auth, payload))]
async fn create_custom_call(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<CustomCallRequest>,
) -> Result<Json<OpenCall>, ApiError> {
    let call = CustomCall::create(&state.db, auth.user.id, &payload).await?;
    Ok(Json(call.into()))
}

#[instrument(skip(state, auth, payload))]
async fn update_custom_call(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomCallRequest>,
) -> Result<Json<OpenCall>, ApiError> {
    let call = CustomCall::update_owned(&state.db, auth.user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Call"))?;
    Ok(Json(call.into()))
}

#[instrument(skip(state, auth))]
async fn delete_custom_call(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !CustomCall::delete_owned(&state.db, auth.user.id, id).await? {
        return Err(ApiError::NotFound("Call"));
    }
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip_all)]
async fn get_preferences(MaybeUser(user): MaybeUser) -> Json<Option<ArtistProfile>> {
    Json(user.and_then(|u| u.artist_profile.map(|p| p.0)))
}

/// Merge-patch: provided fields overwrite, absent fields keep their stored
/// value. Contrast with `PATCH /auth/profile`, which replaces the profile
/// wholesale.
#[instrument(skip(state, auth, payload))]
async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<ArtistProfile>, ApiError> {
    let mut profile = auth
        .user
        .artist_profile
        .map(|p| p.0)
        .unwrap_or_default();

    if let Some(mediums) = payload.mediums {
        profile.mediums = mediums;
    }
    if let Some(location) = payload.location {
        profile.location = location;
    }
    if let Some(career_stage) = payload.career_stage {
        profile.career_stage = career_stage;
    }
    if let Some(themes) = payload.themes {
        profile.themes = themes;
    }
    if let Some(max_entry_fee) = payload.max_entry_fee {
        profile.max_entry_fee = Some(max_entry_fee);
    }
    if let Some(prefer_no_fee) = payload.prefer_no_fee {
        profile.prefer_no_fee = prefer_no_fee;
    }

    User::set_artist_profile(&state.db, auth.user.id, &profile).await?;
    Ok(Json(profile))
}
