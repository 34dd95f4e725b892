use std::collections::HashSet;

use crate::{
    models::{
        Confidence, ConfidenceDistribution, Property, PropertyType, Recommendation,
        RecommendationAnalytics, Zone,
    },
    services::scorer::{self, ScoringContext},
};

/// Most recent views hidden from recommendations
const RECENT_VIEW_WINDOW: usize = 3;

/// Leading output slots that favour an unseen type or zone
const DIVERSE_SLOTS: usize = 3;

/// Generates up to `limit` recommendations from the catalog.
///
/// Excludes the current property and the last few viewed ones, ranks the rest
/// by score (catalog order breaks ties) and then diversifies the head of the
/// list by property type and zone.
pub fn generate(
    properties: &[Property],
    current_property_id: Option<&str>,
    context: &ScoringContext<'_>,
    limit: usize,
) -> Vec<Recommendation> {
    let recently_viewed = context.behavior.recently_viewed(RECENT_VIEW_WINDOW);

    let mut ranked: Vec<Recommendation> = properties
        .iter()
        .filter(|p| current_property_id != Some(p.id.as_str()))
        .filter(|p| !recently_viewed.contains(&p.id))
        .map(|p| Recommendation {
            property: p.clone(),
            score: scorer::score(p, context, properties),
        })
        .collect();

    // sort_by is stable, so equal scores keep catalog order
    ranked.sort_by(|a, b| b.score.score.cmp(&a.score.score));
    ranked.truncate(limit.saturating_mul(2));

    tracing::debug!(
        catalog = properties.len(),
        pool = ranked.len(),
        limit,
        "Scored recommendation candidates"
    );

    diversify(ranked, limit)
}

/// Picks `limit` entries from a score-ordered pool, preferring novel type/zone early on
fn diversify(pool: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    let mut remaining: Vec<Option<Recommendation>> = pool.into_iter().map(Some).collect();
    let mut selected = Vec::with_capacity(limit.min(remaining.len()));
    let mut used_types: HashSet<PropertyType> = HashSet::new();
    let mut used_zones: HashSet<Zone> = HashSet::new();
    let mut diversifying = true;

    while selected.len() < limit {
        let mut pick = None;

        if diversifying && selected.len() < DIVERSE_SLOTS {
            pick = remaining.iter().position(|slot| {
                slot.as_ref().is_some_and(|r| {
                    !used_types.contains(&r.property.property_type)
                        || !used_zones.contains(&r.property.zone)
                })
            });
            if pick.is_none() {
                diversifying = false;
            }
        }

        let pick = match pick.or_else(|| remaining.iter().position(Option::is_some)) {
            Some(index) => index,
            None => break,
        };

        if let Some(recommendation) = remaining[pick].take() {
            used_types.insert(recommendation.property.property_type.clone());
            used_zones.insert(recommendation.property.zone.clone());
            selected.push(recommendation);
        }
    }

    selected
}

/// Builds the analytics summary for a recommendation run
pub fn summarize(
    recommendations: &[Recommendation],
    context: &ScoringContext<'_>,
) -> RecommendationAnalytics {
    let mut distribution = ConfidenceDistribution::default();
    for recommendation in recommendations {
        match recommendation.score.confidence {
            Confidence::High => distribution.high += 1,
            Confidence::Medium => distribution.medium += 1,
            Confidence::Low => distribution.low += 1,
        }
    }

    let average_score = if recommendations.is_empty() {
        0.0
    } else {
        let total: i64 = recommendations.iter().map(|r| r.score.score).sum();
        total as f64 / recommendations.len() as f64
    };

    RecommendationAnalytics {
        total_recommendations: recommendations.len(),
        average_score,
        confidence_distribution: distribution,
        intent_optimized: context.intent.is_set(),
        behavior_data_points: context.behavior.data_points(),
    }
}
