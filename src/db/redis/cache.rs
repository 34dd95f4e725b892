use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::{SessionId, UserBehavior};
use crate::services::behavior::BehaviorStorage;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Behavior(SessionId),
    Catalog,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Behavior(session) => write!(f, "user_behavior:{}", session),
            CacheKey::Catalog => write!(f, "catalog:properties"),
        }
    }
}

/// Creates a Redis client for behavior persistence and caching
///
/// Opening the client does not connect; connections are made per operation
/// through the multiplexed async connection.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes; `ttl: None` keeps the key forever
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: Option<u64>,
}

/// Redis-backed store for session behavior and the catalog listing cache
///
/// Reads go straight to Redis. Writes are queued to a background task, so
/// request handlers return without waiting on the round trip.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and waits for it to stop
    ///
    /// Call after the server has stopped accepting requests; writes queued
    /// later than the signal are not guaranteed to land.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer task
    ///
    /// The returned handle owns the writer task. Keep it for the lifetime of
    /// the server and call `shutdown` on exit so queued behavior is flushed.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        let handle = CacheWriterHandle {
            shutdown_tx,
            writer,
        };

        (cache, handle)
    }

    /// Background task that applies queued writes in order
    ///
    /// Failed writes are logged and counted but never retried. On shutdown the
    /// queue is drained before the task exits.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes = 0usize;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::error!(error = %e, failed_writes, "Failed to write to Redis");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // Senders live in cloned Cache handles, so drain what is queued instead of waiting for close
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message, with an expiry only when it carries a TTL
    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        match msg.ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(msg.key, msg.value, ttl).await?;
            }
            None => {
                let _: () = conn.set(msg.key, msg.value).await?;
            }
        }
        Ok(())
    }

    /// Retrieves and deserializes a value, `None` when the key is absent
    ///
    /// A stored value that no longer deserializes is reported as
    /// `AppError::Internal` rather than treated as a miss; callers decide
    /// whether to fall back.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Serializes the value and queues it for the background writer
    ///
    /// Returns immediately. Serialization and send failures are logged and
    /// dropped, so use this only where a lost write is recoverable. `ttl: None`
    /// writes the key without an expiry.
    pub fn set_in_background<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<u64>,
    ) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[async_trait::async_trait]
impl BehaviorStorage for Cache {
    async fn load(&self, session: &SessionId) -> AppResult<Option<UserBehavior>> {
        self.get_from_cache(&CacheKey::Behavior(*session)).await
    }

    fn persist(&self, session: &SessionId, behavior: &UserBehavior) {
        self.set_in_background(&CacheKey::Behavior(*session), behavior, None);
    }
}
