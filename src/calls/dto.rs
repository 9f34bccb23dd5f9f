use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calls::scorer::Recommendation;

/// Wire shape of an open call, whether curated or user-added. Curated entries
/// carry string ids from the source feed; custom entries use their row uuid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCall {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub entry_fee: Option<f64>,
    pub description: Option<String>,
    #[serde(default)]
    pub mediums: Vec<String>,
    pub theme: Option<String>,
    pub eligibility: Option<String>,
    pub prizes: Option<String>,
    pub url: Option<String>,
    pub source: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub open_date: Option<String>,
}

/// One checklist entry on a saved call state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub item: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStateView {
    pub id: Uuid,
    pub call_id: String,
    pub bookmarked: bool,
    pub hidden: bool,
    pub applied: bool,
    pub application_status: Option<String>,
    pub checklist: Option<Vec<ChecklistItem>>,
}

/// Upsert body for per-call saved state; absent fields leave the stored value
/// untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCallStateRequest {
    pub call_id: String,
    pub bookmarked: Option<bool>,
    pub hidden: Option<bool>,
    pub applied: Option<bool>,
    pub application_status: Option<String>,
    pub checklist: Option<Vec<ChecklistItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCallRequest {
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub entry_fee: Option<f64>,
    pub description: Option<String>,
    pub mediums: Option<Vec<String>>,
    pub theme: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomCallRequest {
    pub title: Option<String>,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub entry_fee: Option<f64>,
    pub description: Option<String>,
    pub mediums: Option<Vec<String>>,
    pub theme: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Merge-patch body for artist preferences. Unlike `PATCH /auth/profile`,
/// provided fields are merged into the stored profile one by one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub mediums: Option<Vec<String>>,
    pub location: Option<String>,
    pub career_stage: Option<String>,
    pub themes: Option<Vec<String>>,
    pub max_entry_fee: Option<f64>,
    pub prefer_no_fee: Option<bool>,
}

/// A call enriched with the caller's saved state and recommendation score.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCall {
    #[serde(flatten)]
    pub call: OpenCall,
    pub bookmarked: bool,
    pub hidden: bool,
    pub applied: bool,
    pub application_status: Option<String>,
    pub checklist: Option<Vec<ChecklistItem>>,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallListResponse {
    pub calls: Vec<EnrichedCall>,
    pub fetched_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::scorer::Tier;

    #[test]
    fn enriched_call_flattens_call_and_recommendation() {
        let enriched = EnrichedCall {
            call: OpenCall {
                id: "nyfa-001".into(),
                title: "Spring Group Exhibition".into(),
                organization: "Brooklyn Art Gallery".into(),
                location: Some("Brooklyn, NY".into()),
                deadline: Some("2025-02-15".into()),
                entry_fee: Some(35.0),
                description: None,
                mediums: vec!["Painting".into()],
                theme: None,
                eligibility: None,
                prizes: None,
                url: None,
                source: "NYFA".into(),
                featured: true,
                kind: Some("exhibition".into()),
                open_date: None,
            },
            bookmarked: true,
            hidden: false,
            applied: false,
            application_status: None,
            checklist: None,
            recommendation: Recommendation {
                score: 80,
                reasons: vec!["Featured opportunity".into()],
                recommendation: Tier::HighlyRecommended,
            },
        };
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["id"], "nyfa-001");
        assert_eq!(json["entryFee"], 35.0);
        assert_eq!(json["type"], "exhibition");
        assert_eq!(json["bookmarked"], true);
        assert_eq!(json["score"], 80);
        assert_eq!(json["recommendation"], "highly-recommended");
    }
}
