use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{BehaviorEvent, SessionId, UserBehavior},
};

/// Durable storage for per-session behavior
///
/// `persist` must not block: implementations queue or write synchronously in memory.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BehaviorStorage: Send + Sync {
    /// Loads the stored behavior, `Ok(None)` when the session has none
    async fn load(&self, session: &SessionId) -> AppResult<Option<UserBehavior>>;

    /// Writes the full behavior object for the session
    fn persist(&self, session: &SessionId, behavior: &UserBehavior);
}

/// In-memory behavior for one session, written through to storage on every change
pub struct BehaviorStore {
    session: SessionId,
    behavior: UserBehavior,
    storage: Arc<dyn BehaviorStorage>,
}

impl BehaviorStore {
    /// Loads the session's behavior, starting empty when nothing usable is stored
    pub async fn load(storage: Arc<dyn BehaviorStorage>, session: SessionId) -> Self {
        let behavior = match storage.load(&session).await {
            Ok(Some(behavior)) => {
                tracing::debug!(
                    session = %session,
                    data_points = behavior.data_points(),
                    "Loaded stored behavior"
                );
                behavior
            }
            Ok(None) => UserBehavior::default(),
            Err(e) => {
                tracing::warn!(session = %session, error = %e, "Discarding unreadable behavior");
                UserBehavior::default()
            }
        };

        Self {
            session,
            behavior,
            storage,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn behavior(&self) -> &UserBehavior {
        &self.behavior
    }

    pub fn into_behavior(self) -> UserBehavior {
        self.behavior
    }

    /// Applies a tracked action and saves the result
    pub fn track(&mut self, event: BehaviorEvent) {
        tracing::debug!(session = %self.session, action = event.action(), "Tracking behavior");

        let behavior = &mut self.behavior;
        match event {
            BehaviorEvent::ViewProperty { property_id } => {
                push_unique(&mut behavior.viewed_properties, property_id)
            }
            BehaviorEvent::SaveProperty { property_id } => {
                push_unique(&mut behavior.saved_properties, property_id)
            }
            BehaviorEvent::Search {
                search_term,
                price_range,
            } => {
                behavior.search_history.push(search_term);
                if let Some(range) = price_range {
                    behavior.price_range_history.push(range);
                }
            }
            BehaviorEvent::TimeSpent {
                property_id,
                time_spent,
            } => {
                behavior
                    .time_spent_on_properties
                    .insert(property_id, time_spent);
            }
            BehaviorEvent::ClickFeature { feature } => {
                push_unique(&mut behavior.clicked_features, feature)
            }
        }

        self.save();
    }

    /// Replaces the externally-supplied location and property-type preferences
    pub fn set_preferences(&mut self, locations: Vec<String>, property_types: Vec<String>) {
        self.behavior.location_preferences = locations;
        self.behavior.property_type_preferences = property_types;
        self.save();
    }

    pub fn save(&self) {
        self.storage.persist(&self.session, &self.behavior);
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
