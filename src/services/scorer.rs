//! Additive point scorer for property recommendations.
//!
//! Scores are unbounded integers meant only for relative ranking. Every factor
//! degrades to zero when the property lacks the data it looks at.

use crate::models::{
    Confidence, Intent, Property, PropertyStatus, RecommendationScore, UserBehavior,
    UserPreferences, Zone,
};

/// Reasons exposed per recommendation
pub const MAX_REASONS: usize = 3;

/// Budget bounds and prices are brought to the crore scale before comparison
const CRORE_DIVISOR: f64 = 100.0;

/// Inputs shared by every candidate in one recommendation run
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub intent: Intent,
    pub preferences: &'a UserPreferences,
    pub behavior: &'a UserBehavior,
}

/// Accumulates points and reasons in evaluation order
struct Tally {
    points: f64,
    reasons: Vec<&'static str>,
}

impl Tally {
    fn award(&mut self, points: f64, reason: &'static str) {
        self.points += points;
        self.reasons.push(reason);
    }

    fn award_if(&mut self, condition: bool, points: f64, reason: &'static str) {
        if condition {
            self.award(points, reason);
        }
    }
}

/// Scores one candidate against the session context.
///
/// `catalog` is used to resolve previously viewed properties for the
/// similarity signal.
pub fn score(
    property: &Property,
    context: &ScoringContext<'_>,
    catalog: &[Property],
) -> RecommendationScore {
    let mut tally = Tally {
        points: finite_or_zero(property.overall_score.unwrap_or(0.0)),
        reasons: Vec::new(),
    };

    match context.intent {
        Intent::Investment => investment_bonuses(property, &mut tally),
        Intent::EndUse => end_use_bonuses(property, &mut tally),
        Intent::Unset => {}
    }

    behavioral_bonuses(property, context, catalog, &mut tally);

    let score = tally.points.round() as i64;
    let confidence = confidence_for(tally.reasons.len(), score);

    RecommendationScore {
        property_id: property.id.clone(),
        score,
        reasons: tally
            .reasons
            .iter()
            .take(MAX_REASONS)
            .map(|r| r.to_string())
            .collect(),
        confidence,
    }
}

fn investment_bonuses(property: &Property, tally: &mut Tally) {
    tally.award_if(property.has_tag("high-roi"), 20.0, "High ROI potential");
    tally.award_if(
        property.has_tag("rental-income"),
        15.0,
        "Strong rental income potential",
    );
    tally.award_if(
        matches!(property.zone, Zone::East | Zone::North),
        10.0,
        "Investment-friendly location",
    );
    tally.award_if(
        property.status == PropertyStatus::PreLaunch,
        12.0,
        "Pre-launch pricing advantage",
    );
    tally.award_if(
        property.has_tag("metro-connectivity"),
        8.0,
        "Metro connectivity boosts value",
    );
}

fn end_use_bonuses(property: &Property, tally: &mut Tally) {
    tally.award_if(
        property.has_tag("family-friendly"),
        20.0,
        "Family-friendly community",
    );
    tally.award_if(property.has_tag("school-nearby"), 15.0, "Good schools nearby");
    tally.award_if(
        property.has_tag("park") || property.has_tag("children-play-area"),
        12.0,
        "Parks and play areas for children",
    );
    tally.award_if(
        property
            .configurations
            .iter()
            .any(|c| c.layout.contains("3 BHK")),
        10.0,
        "Spacious 3 BHK options available",
    );
}

fn behavioral_bonuses(
    property: &Property,
    context: &ScoringContext<'_>,
    catalog: &[Property],
    tally: &mut Tally,
) {
    let behavior = context.behavior;

    let type_matches = behavior
        .property_type_preferences
        .iter()
        .filter(|t| t.as_str() == property.property_type.as_str())
        .count();
    if type_matches > 0 {
        tally.award(
            5.0 * type_matches as f64,
            "Matches your preferred property type",
        );
    }

    let area = property.area.to_lowercase();
    let location_matches = behavior
        .location_preferences
        .iter()
        .filter(|loc| area.contains(&loc.to_lowercase()) || loc.as_str() == property.zone.as_str())
        .count();
    if location_matches > 0 {
        tally.award(3.0 * location_matches as f64, "In your preferred area");
    }

    if let Some((min, max)) = context.preferences.budget_range {
        let (min, max) = (min / CRORE_DIVISOR, max / CRORE_DIVISOR);
        let within_budget = property.configurations.iter().any(|c| {
            let price = c.price / CRORE_DIVISOR;
            price >= min && price <= max
        });
        tally.award_if(within_budget, 15.0, "Within your budget");
    }

    let clicked: Vec<String> = behavior
        .clicked_features
        .iter()
        .map(|f| f.to_lowercase())
        .collect();
    let feature_matches = property
        .tags
        .iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            clicked.iter().any(|feature| tag.contains(feature.as_str()))
        })
        .count();
    if feature_matches > 0 {
        tally.award(
            2.0 * feature_matches as f64,
            "Has features you've shown interest in",
        );
    }

    let similar_to_viewed = behavior
        .viewed_properties
        .iter()
        .filter_map(|id| catalog.iter().find(|p| &p.id == id))
        .any(|viewed| {
            viewed.zone == property.zone
                || viewed.property_type == property.property_type
                || viewed.shares_tag_with(property)
        });
    tally.award_if(similar_to_viewed, 8.0, "Similar to properties you've viewed");

    tally.award_if(
        property.status == PropertyStatus::Active && property.has_tag("trending"),
        5.0,
        "Trending property",
    );
    tally.award_if(
        property.has_tag("premium-developer"),
        7.0,
        "Reputed developer",
    );
}

/// Confidence uses the full reason count, not the truncated list
fn confidence_for(reason_count: usize, score: i64) -> Confidence {
    if reason_count >= 4 && score >= 80 {
        Confidence::High
    } else if reason_count >= 2 && score >= 60 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
