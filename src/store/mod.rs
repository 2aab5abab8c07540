//! Storage seams for the classification cache and the pending-report set.
//!
//! Both are shared external resources; implementations must be safe to call
//! from concurrent passes without any locking by the caller.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Values aligned with `keys`; `None` for missing or expired entries.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// Writes every entry with the same expiry in one batch.
    async fn set_many(&self, entries: &[(String, String)], ttl: Duration) -> Result<()>;
}

#[async_trait]
pub trait SetStore: Send + Sync {
    /// Returns true when the member was not already present.
    async fn add(&self, key: &str, member: &str) -> Result<bool>;

    /// Reads every member and deletes the set in one atomic step.
    async fn drain(&self, key: &str) -> Result<Vec<String>>;
}
