use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::models::{SessionId, UserBehavior};
use crate::services::{BehaviorStorage, BehaviorStore, PropertyCatalog};

/// Sessions untouched for this long are dropped from memory
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A live session's store and when it was last used
struct SessionSlot {
    store: Arc<Mutex<BehaviorStore>>,
    last_used: Instant,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn PropertyCatalog>,
    pub behavior_storage: Arc<dyn BehaviorStorage>,
    pub default_limit: usize,
    /// Behavior stores of sessions that have recorded actions in this process
    sessions: Arc<Mutex<HashMap<SessionId, SessionSlot>>>,
    session_idle_timeout: Duration,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn PropertyCatalog>,
        behavior_storage: Arc<dyn BehaviorStorage>,
        default_limit: usize,
    ) -> Self {
        Self {
            catalog,
            behavior_storage,
            default_limit,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            session_idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }

    /// Overrides how long an idle session stays in memory
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.session_idle_timeout = timeout;
        self
    }

    /// Number of sessions currently held in memory
    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Current behavior of the session without keeping it in memory.
    ///
    /// Live sessions answer from their store. Anything else is read from
    /// storage as a one-off snapshot, so read-only requests never grow the
    /// session map.
    pub async fn behavior_snapshot(&self, session: SessionId) -> UserBehavior {
        let live = {
            let mut sessions = self.sessions.lock().await;
            sessions.get_mut(&session).map(|slot| {
                slot.last_used = Instant::now();
                slot.store.clone()
            })
        };

        match live {
            Some(store) => {
                let store = store.lock().await;
                store.behavior().clone()
            }
            None => BehaviorStore::load(self.behavior_storage.clone(), session)
                .await
                .into_behavior(),
        }
    }

    /// Runs `f` against the session's behavior store, loading it on first use.
    ///
    /// Each session has its own lock, so actions for one session are applied
    /// in order while other sessions proceed independently.
    pub async fn with_behavior<F, R>(&self, session: SessionId, f: F) -> R
    where
        F: FnOnce(&mut BehaviorStore) -> R,
    {
        let store = self.session_store(session).await;
        let mut store = store.lock().await;
        f(&mut *store)
    }

    async fn session_store(&self, session: SessionId) -> Arc<Mutex<BehaviorStore>> {
        {
            let mut sessions = self.sessions.lock().await;
            if let Some(slot) = sessions.get_mut(&session) {
                slot.last_used = Instant::now();
                return slot.store.clone();
            }
        }

        // Storage round trip happens outside the map lock
        let loaded = BehaviorStore::load(self.behavior_storage.clone(), session).await;

        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions);

        match sessions.entry(session) {
            // A concurrent request for the same session got there first
            Entry::Occupied(mut entry) => {
                entry.get_mut().last_used = Instant::now();
                entry.get().store.clone()
            }
            Entry::Vacant(entry) => {
                tracing::info!(session = %session, "Session started");
                let slot = entry.insert(SessionSlot {
                    store: Arc::new(Mutex::new(loaded)),
                    last_used: Instant::now(),
                });
                slot.store.clone()
            }
        }
    }

    fn evict_idle(&self, sessions: &mut HashMap<SessionId, SessionSlot>) {
        let before = sessions.len();
        sessions.retain(|_, slot| slot.last_used.elapsed() < self.session_idle_timeout);

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
    }
}
