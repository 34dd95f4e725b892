pub mod memory;
pub mod redis;

pub use memory::MemoryBehaviorStorage;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;
