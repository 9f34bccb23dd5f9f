use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::convert::Infallible;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::auth::repo::User;
use crate::auth::token::hash_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Session row. Stores only the hash of the bearer token; the raw token is
/// shown to the client once and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Session {
    /// Strict comparison: a session expiring exactly `now` is still valid for
    /// that instant.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        ttl_days: i64,
    ) -> anyhow::Result<Session> {
        let expires_at = OffsetDateTime::now_utc() + Duration::days(ttl_days);
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    pub async fn find_by_token_hash(
        db: &PgPool,
        token_hash: &str,
    ) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    pub async fn delete_by_token_hash(db: &PgPool, token_hash: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Revoke every session of a user except `keep`. Run after a password
    /// change so stolen or forgotten logins elsewhere stop working while the
    /// device that changed the password stays signed in.
    pub async fn delete_other_for_user(
        db: &PgPool,
        user_id: Uuid,
        keep: Uuid,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND id <> $2")
            .bind(user_id)
            .bind(keep)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Sweep rows past their expiry. Idempotent maintenance; expired sessions
    /// are already rejected at resolution time, this just reclaims them.
    pub async fn cleanup_expired(db: &PgPool) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < now()")
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Resolve a bearer token to its session and owning user. One shared function
/// for every authenticated operation: missing session, expired session and
/// dangling user id all collapse into `None`, so responses cannot be used as
/// a token-guessing oracle.
pub async fn resolve_session(
    db: &PgPool,
    token: &str,
) -> anyhow::Result<Option<(Session, User)>> {
    let token_hash = hash_token(token);
    let Some(session) = Session::find_by_token_hash(db, &token_hash).await? else {
        return Ok(None);
    };
    if session.is_expired(OffsetDateTime::now_utc()) {
        return Ok(None);
    }
    let Some(user) = User::find_by_id(db, session.user_id).await? else {
        return Ok(None);
    };
    Ok(Some((session, user)))
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(|t| t.to_string())
}

/// Raw bearer token, if the client sent one. Used by operations that need the
/// token itself rather than the resolved user (logout).
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl FromRequestParts<AppState> for BearerToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts)))
    }
}

/// Authenticated principal for mutations. Rejects with a uniform
/// "Not authenticated" whether the token is absent, unknown or expired.
pub struct AuthSession {
    pub user: User,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::NotAuthenticated)?;
        match resolve_session(&state.db, &token).await? {
            Some((session, user)) => Ok(AuthSession { user, session }),
            None => Err(ApiError::NotAuthenticated),
        }
    }
}

/// Optional principal for read-side operations, which answer with an empty
/// result rather than an error when unauthenticated.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeUser(None));
        };
        let user = resolve_session(&state.db, &token)
            .await?
            .map(|(_, user)| user);
        Ok(MaybeUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring_at(expires_at: OffsetDateTime) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "hash".into(),
            expires_at,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn expiry_is_strict() {
        let now = OffsetDateTime::now_utc();
        assert!(session_expiring_at(now - Duration::milliseconds(1)).is_expired(now));
        assert!(!session_expiring_at(now + Duration::days(1)).is_expired(now));
        // Exactly now is still valid
        assert!(!session_expiring_at(now).is_expired(now));
    }
}
