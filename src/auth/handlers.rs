use axum::{
    extract::State,
    routing::{get, patch, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, SignupRequest,
            UpdateProfileRequest,
        },
        password::{hash_password, verify_password},
        repo::User,
        session::{AuthSession, BearerToken, MaybeUser, Session},
        token::{generate_session_token, hash_token},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(validate_session))
        .route("/auth/profile", patch(update_profile))
        .route("/auth/password", post(change_password))
        .route("/auth/cleanup", post(cleanup_expired_sessions))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Issue a fresh session and hand the raw token back. Only the hash lands in
/// the database.
async fn issue_session(db: &PgPool, user_id: Uuid, ttl_days: i64) -> anyhow::Result<String> {
    let token = generate_session_token();
    Session::create(db, user_id, &hash_token(&token), ttl_days).await?;
    Ok(token)
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email format"));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "signup with registered email");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password);
    // The unique index on email backs up the lookup above: two signups racing
    // past the check collapse into one insert and one conflict here.
    let user = match User::create(&state.db, &email, &hash, name).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_session(&state.db, user.id, state.config.session_ttl_days).await?;

    info!(user_id = %user.id, "user signed up");
    Ok(Json(AuthResponse {
        session_token: token,
        user: user.into(),
    }))
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password take the same branch so the response
    // cannot confirm whether an account exists.
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    User::touch_last_login(&state.db, user.id).await?;
    let token = issue_session(&state.db, user.id, state.config.session_ttl_days).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        session_token: token,
        user: user.into(),
    }))
}

/// Idempotent: succeeds silently when the session is already gone.
#[instrument(skip(state, token))]
async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, ApiError> {
    if let Some(token) = token {
        Session::delete_by_token_hash(&state.db, &hash_token(&token)).await?;
    }
    Ok(Json(json!({ "success": true })))
}

/// Read-only session check. Never errors for a missing or expired session.
#[instrument(skip_all)]
async fn validate_session(MaybeUser(user): MaybeUser) -> Json<Option<PublicUser>> {
    Json(user.map(PublicUser::from))
}

#[instrument(skip(state, auth, payload))]
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let name = payload.name.as_deref().map(str::trim);
    let user = User::update_profile(
        &state.db,
        auth.user.id,
        name,
        payload.artist_profile.as_ref(),
    )
    .await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth, payload))]
async fn change_password(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.new_password.len() < 6 {
        return Err(ApiError::validation(
            "New password must be at least 6 characters",
        ));
    }
    if !verify_password(&payload.current_password, &auth.user.password_hash) {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    User::set_password_hash(&state.db, auth.user.id, &hash_password(&payload.new_password))
        .await?;

    // Best-effort sweep of every other device's session; the session that
    // performed the change stays alive.
    let revoked = Session::delete_other_for_user(&state.db, auth.user.id, auth.session.id).await?;
    info!(user_id = %auth.user.id, revoked, "password changed");

    Ok(Json(json!({ "success": true })))
}

/// Maintenance sweep over expired rows. Deliberately unauthenticated, as the
/// original deployment exposed it; it only deletes rows that can no longer
/// authenticate anyone.
#[instrument(skip(state))]
async fn cleanup_expired_sessions(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let deleted = Session::cleanup_expired(&state.db).await?;
    info!(deleted, "expired sessions swept");
    Ok(Json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("ann.painter+studio@example.co.uk"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("space in@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@"));
    }
}
