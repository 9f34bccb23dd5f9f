use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};

use crate::auth::dto::ArtistProfile;
use crate::calls::dto::OpenCall;

/// Curated source whose listings get the prestige bonus alongside featured
/// calls.
pub const TRUSTED_SOURCE: &str = "NYFA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    HighlyRecommended,
    Recommended,
    Consider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub score: i32,
    pub reasons: Vec<String>,
    pub recommendation: Tier,
}

fn parse_deadline(s: &str) -> Option<Date> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(s, &fmt).ok()
}

/// Score an open call against an artist's preference profile.
///
/// Base score 50 with additive weighted signals, each appending a
/// human-readable reason; the result is clamped to [0, 100]. Pure and
/// deterministic: `now` is a parameter, and identical inputs always produce
/// identical output.
pub fn score_call(call: &OpenCall, prefs: &ArtistProfile, now: OffsetDateTime) -> Recommendation {
    let mut score: i32 = 50;
    let mut reasons: Vec<String> = Vec::new();

    // Medium overlap is the strongest signal; the substring test runs in both
    // directions so "Painting" matches a preference of "oil painting".
    if !prefs.mediums.is_empty() && !call.mediums.is_empty() {
        let matching: Vec<&str> = call
            .mediums
            .iter()
            .filter(|m| {
                let m_lower = m.to_lowercase();
                prefs.mediums.iter().any(|pm| {
                    let pm_lower = pm.to_lowercase();
                    m_lower.contains(&pm_lower) || pm_lower.contains(&m_lower)
                })
            })
            .map(String::as_str)
            .collect();
        if !matching.is_empty() {
            score += 20;
            reasons.push(format!("Matches your medium: {}", matching.join(", ")));
        }
    }

    // Location affinity: cross-containment, comparing the preference against
    // the call location's first comma segment for the reverse direction.
    if !prefs.location.is_empty() {
        if let Some(call_loc) = call.location.as_deref().filter(|l| !l.is_empty()) {
            let pref_loc = prefs.location.to_lowercase();
            let call_loc = call_loc.to_lowercase();
            let call_city = call_loc.split(',').next().unwrap_or(&call_loc);
            if call_loc.contains(&pref_loc) || pref_loc.contains(call_city) {
                score += 15;
                reasons.push("Local opportunity".to_string());
            }
        }
    }

    if !prefs.career_stage.is_empty() {
        if let Some(eligibility) = call.eligibility.as_deref() {
            let elig_lower = eligibility.to_lowercase();
            if elig_lower.contains(&prefs.career_stage.to_lowercase())
                || elig_lower.contains("all")
            {
                score += 10;
                reasons.push("Matches your career stage".to_string());
            }
        }
    }

    if !prefs.themes.is_empty() {
        if let Some(theme) = call.theme.as_deref() {
            let theme_lower = theme.to_lowercase();
            let matching: Vec<&str> = prefs
                .themes
                .iter()
                .filter(|t| theme_lower.contains(&t.to_lowercase()))
                .map(String::as_str)
                .collect();
            if !matching.is_empty() {
                score += 15;
                reasons.push(format!("Theme aligns: {}", matching.join(", ")));
            }
        }
    }

    // Fee handling: free is always a positive signal, bigger when the artist
    // asked for free opportunities.
    let free = call.entry_fee.map_or(true, |fee| fee == 0.0);
    if free {
        if prefs.prefer_no_fee {
            score += 10;
            reasons.push("No entry fee".to_string());
        } else {
            score += 5;
            reasons.push("Free to apply".to_string());
        }
    } else if let (Some(fee), Some(max)) = (call.entry_fee, prefs.max_entry_fee) {
        if fee <= max {
            score += 5;
            reasons.push("Within budget".to_string());
        } else {
            score -= 10;
            reasons.push("Entry fee exceeds budget".to_string());
        }
    }

    if let Some(deadline) = call.deadline.as_deref().and_then(parse_deadline) {
        let days_until = (deadline - now.date()).whole_days();
        if days_until > 0 && days_until <= 14 {
            score += 5;
            reasons.push("Closing soon - act fast!".to_string());
        }
    }

    if call.featured || call.source == TRUSTED_SOURCE {
        score += 5;
        reasons.push("Featured opportunity".to_string());
    }

    let score = score.clamp(0, 100);
    let recommendation = if score >= 75 {
        Tier::HighlyRecommended
    } else if score >= 50 {
        Tier::Recommended
    } else {
        Tier::Consider
    };

    Recommendation {
        score,
        reasons,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn bare_call() -> OpenCall {
        OpenCall {
            id: "test-001".into(),
            title: "Test Call".into(),
            organization: "Test Org".into(),
            location: None,
            deadline: None,
            entry_fee: Some(25.0),
            description: None,
            mediums: vec![],
            theme: None,
            eligibility: None,
            prizes: None,
            url: None,
            source: "Manual".into(),
            featured: false,
            kind: None,
            open_date: None,
        }
    }

    fn date_string(date: Date) -> String {
        let fmt = format_description!("[year]-[month]-[day]");
        date.format(&fmt).unwrap()
    }

    #[test]
    fn brooklyn_painter_scenario_maxes_out() {
        let now = OffsetDateTime::now_utc();
        let call = OpenCall {
            location: Some("Brooklyn, NY".into()),
            deadline: Some(date_string(now.date() + Duration::days(10))),
            entry_fee: Some(0.0),
            mediums: vec!["Painting".into()],
            featured: true,
            ..bare_call()
        };
        let prefs = ArtistProfile {
            mediums: vec!["painting".into()],
            location: "Brooklyn".into(),
            prefer_no_fee: true,
            ..Default::default()
        };

        let rec = score_call(&call, &prefs, now);
        // 50 + 20 + 15 + 10 + 5 + 5 = 105, clamped
        assert_eq!(rec.score, 100);
        assert_eq!(rec.recommendation, Tier::HighlyRecommended);
        for expected in [
            "Matches your medium: Painting",
            "Local opportunity",
            "No entry fee",
            "Closing soon - act fast!",
            "Featured opportunity",
        ] {
            assert!(
                rec.reasons.iter().any(|r| r == expected),
                "missing reason {expected:?} in {:?}",
                rec.reasons
            );
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let now = OffsetDateTime::now_utc();
        let call = OpenCall {
            mediums: vec!["Sculpture".into()],
            theme: Some("Nature and Environment".into()),
            ..bare_call()
        };
        let prefs = ArtistProfile {
            mediums: vec!["sculpture".into()],
            themes: vec!["nature".into()],
            ..Default::default()
        };
        assert_eq!(score_call(&call, &prefs, now), score_call(&call, &prefs, now));
    }

    #[test]
    fn score_stays_within_bounds() {
        let now = OffsetDateTime::now_utc();
        // Everything stacked against the call
        let call = OpenCall {
            entry_fee: Some(500.0),
            ..bare_call()
        };
        let prefs = ArtistProfile {
            max_entry_fee: Some(25.0),
            ..Default::default()
        };
        let rec = score_call(&call, &prefs, now);
        assert_eq!(rec.score, 40);
        assert_eq!(rec.recommendation, Tier::Consider);
        assert!(rec
            .reasons
            .iter()
            .any(|r| r == "Entry fee exceeds budget"));
        assert!((0..=100).contains(&rec.score));
    }

    #[test]
    fn free_call_without_preference_is_a_smaller_signal() {
        let now = OffsetDateTime::now_utc();
        let call = OpenCall {
            entry_fee: None,
            ..bare_call()
        };
        let rec = score_call(&call, &ArtistProfile::default(), now);
        assert_eq!(rec.score, 55);
        assert_eq!(rec.recommendation, Tier::Recommended);
        assert!(rec.reasons.iter().any(|r| r == "Free to apply"));
    }

    #[test]
    fn fee_within_budget_is_a_positive_signal() {
        let now = OffsetDateTime::now_utc();
        let prefs = ArtistProfile {
            max_entry_fee: Some(50.0),
            ..Default::default()
        };
        let rec = score_call(&bare_call(), &prefs, now);
        assert_eq!(rec.score, 55);
        assert!(rec.reasons.iter().any(|r| r == "Within budget"));
    }

    #[test]
    fn career_stage_matches_eligibility_or_all() {
        let now = OffsetDateTime::now_utc();
        let prefs = ArtistProfile {
            career_stage: "emerging".into(),
            ..Default::default()
        };

        let matching = OpenCall {
            eligibility: Some("Emerging and mid-career artists".into()),
            ..bare_call()
        };
        assert!(score_call(&matching, &prefs, now)
            .reasons
            .iter()
            .any(|r| r == "Matches your career stage"));

        let open_to_all = OpenCall {
            eligibility: Some("All career stages".into()),
            ..bare_call()
        };
        assert!(score_call(&open_to_all, &prefs, now)
            .reasons
            .iter()
            .any(|r| r == "Matches your career stage"));

        let mismatched = OpenCall {
            eligibility: Some("Established artists only".into()),
            ..bare_call()
        };
        assert!(!score_call(&mismatched, &prefs, now)
            .reasons
            .iter()
            .any(|r| r == "Matches your career stage"));
    }

    #[test]
    fn urgency_bonus_respects_the_fourteen_day_window() {
        let now = OffsetDateTime::now_utc();
        let prefs = ArtistProfile::default();
        let closing_soon = |days: i64| OpenCall {
            deadline: Some(date_string(now.date() + Duration::days(days))),
            ..bare_call()
        };

        let has_bonus = |days: i64| {
            score_call(&closing_soon(days), &prefs, now)
                .reasons
                .iter()
                .any(|r| r == "Closing soon - act fast!")
        };
        assert!(has_bonus(14));
        assert!(has_bonus(1));
        assert!(!has_bonus(15));
        assert!(!has_bonus(0));
        assert!(!has_bonus(-3));
    }

    #[test]
    fn unparseable_deadline_is_ignored() {
        let now = OffsetDateTime::now_utc();
        let call = OpenCall {
            deadline: Some("soon".into()),
            ..bare_call()
        };
        let rec = score_call(&call, &ArtistProfile::default(), now);
        assert_eq!(rec.score, 50);
    }

    #[test]
    fn trusted_source_counts_as_featured() {
        let now = OffsetDateTime::now_utc();
        let call = OpenCall {
            source: TRUSTED_SOURCE.into(),
            ..bare_call()
        };
        assert!(score_call(&call, &ArtistProfile::default(), now)
            .reasons
            .iter()
            .any(|r| r == "Featured opportunity"));
    }

    #[test]
    fn tier_boundaries_sit_at_50_and_75() {
        let now = OffsetDateTime::now_utc();
        // 50 + 20 + 5 = 75: medium match on a free call
        let call = OpenCall {
            entry_fee: Some(0.0),
            mediums: vec!["Photography".into()],
            ..bare_call()
        };
        let prefs = ArtistProfile {
            mediums: vec!["photography".into()],
            ..Default::default()
        };
        let rec = score_call(&call, &prefs, now);
        assert_eq!(rec.score, 75);
        assert_eq!(rec.recommendation, Tier::HighlyRecommended);

        // Plain paid call with no signals stays at the base 50
        let rec = score_call(&bare_call(), &ArtistProfile::default(), now);
        assert_eq!(rec.score, 50);
        assert_eq!(rec.recommendation, Tier::Recommended);

        // 50 - 10 = 40 drops below the recommended band
        let pricey = OpenCall {
            entry_fee: Some(80.0),
            ..bare_call()
        };
        let tight = ArtistProfile {
            max_entry_fee: Some(10.0),
            ..Default::default()
        };
        assert_eq!(
            score_call(&pricey, &tight, now).recommendation,
            Tier::Consider
        );
    }

    #[test]
    fn tier_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(Tier::HighlyRecommended).unwrap(),
            "highly-recommended"
        );
        assert_eq!(serde_json::to_value(Tier::Recommended).unwrap(), "recommended");
        assert_eq!(serde_json::to_value(Tier::Consider).unwrap(), "consider");
    }
}
