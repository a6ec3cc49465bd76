//! Cache layer
//!
//! Two cache-aside views over the store, both disposable:
//! - `resolve:{code}` -> original URL
//! - `dedup:{url}[:{owner}]` -> code
//!
//! Backends implement [`KvCache`]; the engine only talks to them through
//! [`CacheLayer`], which bounds every call and turns failures into misses.

pub mod keys;
pub mod layer;
pub mod memory;
pub mod null;
pub mod redis;
pub mod traits;

use std::sync::Arc;

use tracing::info;

use crate::config::CacheConfig;
use crate::errors::{QuicklinkError, Result};

pub use keys::{CacheKey, Namespace};
pub use layer::CacheLayer;
pub use memory::MokaCache;
pub use null::NullCache;
pub use redis::RedisCache;
pub use traits::KvCache;

pub struct CacheFactory;

impl CacheFactory {
    /// Build the configured backend. For redis this blocks on the bounded
    /// connect loop and fails startup when it is exhausted.
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn KvCache>> {
        let cache: Arc<dyn KvCache> = match config.backend.as_str() {
            "redis" => Arc::new(RedisCache::connect(&config.redis).await?),
            "memory" => Arc::new(MokaCache::new(config.memory.max_capacity)),
            "none" => Arc::new(NullCache),
            other => {
                return Err(QuicklinkError::config(format!(
                    "Unknown cache backend '{}'. Supported: redis, memory, none",
                    other
                )));
            }
        };

        info!("Using cache backend: {}", cache.backend_name());
        Ok(cache)
    }
}
