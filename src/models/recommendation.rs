use serde::{Deserialize, Serialize};

use super::Property;

/// Shopping motivation supplied by the calling page
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Intent {
    #[serde(rename = "investment")]
    Investment,
    #[serde(rename = "end-use")]
    EndUse,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Intent {
    pub fn is_set(&self) -> bool {
        !matches!(self, Intent::Unset)
    }
}

/// Explicit preferences supplied alongside a recommendation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Inclusive `[min, max]` budget in the same unit as configuration prices
    #[serde(default)]
    pub budget_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Score and explanation for one candidate property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationScore {
    pub property_id: String,
    pub score: i64,
    /// At most three reasons, in evaluation order
    pub reasons: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub property: Property,
    pub score: RecommendationScore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfidenceDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Summary of a recommendation run for display and debugging
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationAnalytics {
    pub total_recommendations: usize,
    pub average_score: f64,
    pub confidence_distribution: ConfidenceDistribution,
    pub intent_optimized: bool,
    pub behavior_data_points: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serialization() {
        assert_eq!(
            serde_json::to_string(&Intent::EndUse).unwrap(),
            "\"end-use\""
        );
        let unset: Intent = serde_json::from_str("\"\"").unwrap();
        assert_eq!(unset, Intent::Unset);
        assert!(!unset.is_set());
        assert!(Intent::Investment.is_set());
    }

    #[test]
    fn test_confidence_serialization() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"high\"");
    }
}
