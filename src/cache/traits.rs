use std::time::Duration;

use async_trait::async_trait;

use crate::cache::CacheKey;
use crate::errors::Result;

/// Raw key-value cache backend.
///
/// Errors are returned, not swallowed; [`crate::cache::CacheLayer`] decides
/// that a failing cache is just a miss.
#[async_trait]
pub trait KvCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Store `value` under `key`, expiring `ttl` after this write. Reads do
    /// not extend the TTL.
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()>;

    async fn invalidate(&self, key: &CacheKey) -> Result<()>;

    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
