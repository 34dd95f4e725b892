use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use uuid::Uuid;

/// Identifies one browsing session whose behavior is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interaction history for a session, persisted as a single JSON object
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserBehavior {
    pub viewed_properties: Vec<String>,
    pub saved_properties: Vec<String>,
    pub search_history: Vec<String>,
    pub price_range_history: Vec<(f64, f64)>,
    pub location_preferences: Vec<String>,
    pub property_type_preferences: Vec<String>,
    pub time_spent_on_properties: BTreeMap<String, f64>,
    pub clicked_features: Vec<String>,
}

impl UserBehavior {
    /// The most recent `n` viewed property ids, oldest first
    pub fn recently_viewed(&self, n: usize) -> &[String] {
        let start = self.viewed_properties.len().saturating_sub(n);
        &self.viewed_properties[start..]
    }

    /// Total number of recorded signals across every field
    pub fn data_points(&self) -> usize {
        self.viewed_properties.len()
            + self.saved_properties.len()
            + self.search_history.len()
            + self.price_range_history.len()
            + self.location_preferences.len()
            + self.property_type_preferences.len()
            + self.time_spent_on_properties.len()
            + self.clicked_features.len()
    }
}

/// A single tracked user action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BehaviorEvent {
    ViewProperty {
        property_id: String,
    },
    SaveProperty {
        property_id: String,
    },
    Search {
        search_term: String,
        #[serde(default)]
        price_range: Option<(f64, f64)>,
    },
    TimeSpent {
        property_id: String,
        time_spent: f64,
    },
    ClickFeature {
        feature: String,
    },
}

impl BehaviorEvent {
    pub fn action(&self) -> &'static str {
        match self {
            BehaviorEvent::ViewProperty { .. } => "view_property",
            BehaviorEvent::SaveProperty { .. } => "save_property",
            BehaviorEvent::Search { .. } => "search",
            BehaviorEvent::TimeSpent { .. } => "time_spent",
            BehaviorEvent::ClickFeature { .. } => "click_feature",
        }
    }
}
