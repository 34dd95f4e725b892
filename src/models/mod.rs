mod behavior;
mod property;
mod recommendation;

pub use behavior::{BehaviorEvent, SessionId, UserBehavior};
pub use property::{Configuration, Property, PropertyStatus, PropertyType, Zone};
pub use recommendation::{
    Confidence, ConfidenceDistribution, Intent, Recommendation, RecommendationAnalytics,
    RecommendationScore, UserPreferences,
};
