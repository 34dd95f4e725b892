use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{SessionId, UserBehavior};
use crate::services::behavior::BehaviorStorage;

/// Process-local behavior storage for tests and runs without Redis.
///
/// Stores serialized JSON so that load goes through the same parse path as the
/// Redis backend.
#[derive(Default)]
pub struct MemoryBehaviorStorage {
    entries: Mutex<HashMap<SessionId, String>>,
}

impl MemoryBehaviorStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw payload for a session, bypassing serialization
    pub fn insert_raw(&self, session: SessionId, raw: impl Into<String>) {
        self.lock().insert(session, raw.into());
    }

    /// Raw stored payload for a session
    pub fn raw(&self, session: &SessionId) -> Option<String> {
        self.lock().get(session).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl BehaviorStorage for MemoryBehaviorStorage {
    async fn load(&self, session: &SessionId) -> AppResult<Option<UserBehavior>> {
        match self.raw(session) {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AppError::Internal(format!("Stored behavior is corrupt: {}", e))),
            None => Ok(None),
        }
    }

    fn persist(&self, session: &SessionId, behavior: &UserBehavior) {
        match serde_json::to_string(behavior) {
            Ok(json) => {
                self.lock().insert(*session, json);
            }
            Err(e) => tracing::error!(error = %e, session = %session, "Behavior serialization error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_session_loads_none() {
        let storage = MemoryBehaviorStorage::new();
        assert_eq!(storage.load(&SessionId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let storage = MemoryBehaviorStorage::new();
        let session = SessionId::new();
        let behavior = UserBehavior {
            clicked_features: vec!["pool".to_string()],
            ..Default::default()
        };

        storage.persist(&session, &behavior);

        assert!(storage.raw(&session).unwrap().contains("clickedFeatures"));
        assert_eq!(storage.load(&session).await.unwrap(), Some(behavior));
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_an_error() {
        let storage = MemoryBehaviorStorage::new();
        let session = SessionId::new();
        storage.insert_raw(session, "[1, 2");
        assert!(storage.load(&session).await.is_err());
    }
}
