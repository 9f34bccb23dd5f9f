use crate::calls::dto::OpenCall;

/// Built-in curated listing, modeled on NYFA classifieds. Stands in for the
/// live feed until the scraper integration lands; ids are stable so saved
/// call state keyed on them survives restarts.
pub fn curated_calls() -> Vec<OpenCall> {
    vec![
        OpenCall {
            id: "nyfa-001".into(),
            title: "Spring Group Exhibition".into(),
            organization: "Brooklyn Art Gallery".into(),
            location: Some("Brooklyn, NY".into()),
            deadline: Some("2025-02-15".into()),
            entry_fee: Some(35.0),
            description: Some(
                "Seeking emerging and mid-career artists for our annual spring group \
                 exhibition. All 2D mediums welcome."
                    .into(),
            ),
            mediums: vec![
                "Painting".into(),
                "Drawing".into(),
                "Photography".into(),
                "Mixed Media".into(),
            ],
            theme: Some("Renewal and Transformation".into()),
            eligibility: Some("Emerging and mid-career artists".into()),
            prizes: Some("Exhibition opportunity, $500 best in show".into()),
            url: Some("https://example.com/spring-exhibition".into()),
            source: "NYFA".into(),
            featured: true,
            kind: Some("exhibition".into()),
            open_date: Some("2024-12-01".into()),
        },
        OpenCall {
            id: "nyfa-002".into(),
            title: "Artist Residency Program 2025".into(),
            organization: "Catskills Art Center".into(),
            location: Some("Catskills, NY".into()),
            deadline: Some("2025-03-01".into()),
            entry_fee: Some(0.0),
            description: Some(
                "Month-long summer residency for artists working in any medium. Housing \
                 and studio space provided."
                    .into(),
            ),
            mediums: vec!["All Mediums".into()],
            theme: Some("Open theme".into()),
            eligibility: Some("All career stages".into()),
            prizes: Some("Housing, studio space, $1500 stipend".into()),
            url: Some("https://example.com/catskills-residency".into()),
            source: "NYFA".into(),
            featured: true,
            kind: Some("residency".into()),
            open_date: Some("2024-11-15".into()),
        },
        OpenCall {
            id: "nyfa-003".into(),
            title: "Abstract Expressions Juried Show".into(),
            organization: "Manhattan Arts Collective".into(),
            location: Some("Manhattan, NY".into()),
            deadline: Some("2025-01-31".into()),
            entry_fee: Some(45.0),
            description: Some(
                "National juried exhibition celebrating abstract art in all forms.".into(),
            ),
            mediums: vec!["Painting".into(), "Sculpture".into(), "Mixed Media".into()],
            theme: Some("Abstract, Non-representational".into()),
            eligibility: Some("Open to all US-based artists".into()),
            prizes: Some("$2000 first place, $1000 second place, exhibition".into()),
            url: Some("https://example.com/abstract-show".into()),
            source: "NYFA".into(),
            featured: false,
            kind: Some("exhibition".into()),
            open_date: Some("2024-12-15".into()),
        },
        OpenCall {
            id: "nyfa-004".into(),
            title: "Emerging Photographers Grant".into(),
            organization: "Light & Lens Foundation".into(),
            location: Some("National".into()),
            deadline: Some("2025-02-28".into()),
            entry_fee: Some(25.0),
            description: Some(
                "Supporting emerging photographers with project grants and mentorship \
                 opportunities."
                    .into(),
            ),
            mediums: vec![
                "Photography".into(),
                "Digital Photography".into(),
                "Film Photography".into(),
            ],
            theme: Some("Documentary, Fine Art, Conceptual".into()),
            eligibility: Some(
                "Emerging artists with less than 5 years professional experience".into(),
            ),
            prizes: Some("$5000 grant, mentorship program, portfolio review".into()),
            url: Some("https://example.com/photo-grant".into()),
            source: "NYFA".into(),
            featured: true,
            kind: Some("grant".into()),
            open_date: Some("2024-12-01".into()),
        },
        OpenCall {
            id: "nyfa-005".into(),
            title: "Sculpture in the Park".into(),
            organization: "Hudson Valley Arts Council".into(),
            location: Some("Hudson Valley, NY".into()),
            deadline: Some("2025-04-15".into()),
            entry_fee: Some(50.0),
            description: Some(
                "Outdoor sculpture exhibition in scenic Hudson Valley park. Works must \
                 withstand outdoor conditions."
                    .into(),
            ),
            mediums: vec![
                "Sculpture".into(),
                "Installation".into(),
                "Mixed Media".into(),
            ],
            theme: Some("Nature and Environment".into()),
            eligibility: Some("Mid-career and established artists".into()),
            prizes: Some("Exhibition, $3000 acquisition prize, catalog inclusion".into()),
            url: Some("https://example.com/sculpture-park".into()),
            source: "NYFA".into(),
            featured: false,
            kind: Some("exhibition".into()),
            open_date: Some("2025-01-01".into()),
        },
        OpenCall {
            id: "nyfa-006".into(),
            title: "Digital Arts Open Call".into(),
            organization: "New Media Gallery".into(),
            location: Some("Queens, NY".into()),
            deadline: Some("2025-02-01".into()),
            entry_fee: Some(0.0),
            description: Some(
                "Seeking innovative digital and new media works for upcoming exhibition \
                 exploring technology and art."
                    .into(),
            ),
            mediums: vec![
                "Digital Art".into(),
                "Video".into(),
                "Installation".into(),
                "Interactive".into(),
            ],
            theme: Some("Technology, AI, Virtual Reality".into()),
            eligibility: Some("All career stages".into()),
            prizes: Some("Exhibition, artist talk, $1000 honorarium".into()),
            url: Some("https://example.com/digital-arts".into()),
            source: "NYFA".into(),
            featured: true,
            kind: Some("exhibition".into()),
            open_date: Some("2024-12-10".into()),
        },
        OpenCall {
            id: "nyfa-007".into(),
            title: "Community Mural Project".into(),
            organization: "Bronx Arts Initiative".into(),
            location: Some("Bronx, NY".into()),
            deadline: Some("2025-01-20".into()),
            entry_fee: Some(0.0),
            description: Some(
                "Seeking muralists for public art project celebrating community heritage \
                 and diversity."
                    .into(),
            ),
            mediums: vec!["Mural".into(), "Painting".into(), "Mixed Media".into()],
            theme: Some("Community, Heritage, Diversity".into()),
            eligibility: Some("Local artists preferred, all levels welcome".into()),
            prizes: Some("$8000 commission, materials provided".into()),
            url: Some("https://example.com/bronx-mural".into()),
            source: "NYFA".into(),
            featured: false,
            kind: Some("commission".into()),
            open_date: Some("2024-11-01".into()),
        },
        OpenCall {
            id: "nyfa-008".into(),
            title: "Women in Art Fellowship".into(),
            organization: "Foundation for Women Artists".into(),
            location: Some("National".into()),
            deadline: Some("2025-03-15".into()),
            entry_fee: Some(30.0),
            description: Some(
                "Supporting women-identifying artists with unrestricted fellowships for \
                 artistic development."
                    .into(),
            ),
            mediums: vec!["All Mediums".into()],
            theme: Some("Open theme".into()),
            eligibility: Some("Women-identifying artists, mid-career".into()),
            prizes: Some("$10000 unrestricted fellowship".into()),
            url: Some("https://example.com/women-fellowship".into()),
            source: "NYFA".into(),
            featured: true,
            kind: Some("fellowship".into()),
            open_date: Some("2025-01-01".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_ids_are_unique() {
        let calls = curated_calls();
        let mut ids: Vec<&str> = calls.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), calls.len());
    }
}
