use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;

/// Embedded artist preference profile, replaced wholesale by
/// `PATCH /auth/profile` and merged field-by-field by the open-calls
/// preferences endpoint. Also the scorer's input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    #[serde(default)]
    pub mediums: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub career_stage: String,
    #[serde(default)]
    pub themes: Vec<String>,
    pub max_entry_fee: Option<f64>,
    #[serde(default)]
    pub prefer_no_fee: bool,
}

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub artist_profile: Option<ArtistProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Returned after signup or login; the raw session token appears here once
/// and is never stored server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub session_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client. Never carries the
/// password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub artist_profile: Option<ArtistProfile>,
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            artist_profile: u.artist_profile.map(|p| p.0),
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_profile_uses_camel_case_on_the_wire() {
        let profile = ArtistProfile {
            mediums: vec!["painting".into()],
            location: "Brooklyn".into(),
            career_stage: "emerging".into(),
            themes: vec!["abstract".into()],
            max_entry_fee: Some(40.0),
            prefer_no_fee: true,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["careerStage"], "emerging");
        assert_eq!(json["maxEntryFee"], 40.0);
        assert_eq!(json["preferNoFee"], true);
    }

    #[test]
    fn artist_profile_tolerates_sparse_input() {
        let profile: ArtistProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.mediums.is_empty());
        assert_eq!(profile.max_entry_fee, None);
        assert!(!profile.prefer_no_fee);
    }
}
