use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{trace, warn};

use crate::cache::{CacheKey, KvCache};
use crate::config::CacheConfig;
use crate::errors::{QuicklinkError, Result};

/// Best-effort front for a [`KvCache`].
///
/// Every call is bounded by `timeout`. Errors and timeouts are logged and
/// degrade to "miss" / "not written"; they never reach the caller.
#[derive(Clone)]
pub struct CacheLayer {
    backend: Arc<dyn KvCache>,
    ttl: Duration,
    timeout: Duration,
}

impl CacheLayer {
    pub fn new(backend: Arc<dyn KvCache>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            ttl,
            timeout,
        }
    }

    pub fn from_config(backend: Arc<dyn KvCache>, config: &CacheConfig) -> Self {
        Self::new(
            backend,
            Duration::from_secs(config.ttl_secs),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(QuicklinkError::cache_connection(format!(
                "cache {} timed out after {:?}",
                op, self.timeout
            ))),
        }
    }

    /// `None` on miss, error or timeout.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        match self.bounded("get", self.backend.get(key)).await {
            Ok(value) => {
                trace!("cache get {} -> hit={}", key, value.is_some());
                value
            }
            Err(e) => {
                warn!("Cache get failed for {}, treating as miss: {}", key, e);
                None
            }
        }
    }

    /// Write with the configured TTL. Returns whether the write landed.
    pub async fn set(&self, key: &CacheKey, value: &str) -> bool {
        match self.bounded("set", self.backend.set(key, value, self.ttl)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache set failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Returns whether the entry is known to be gone.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        match self.bounded("invalidate", self.backend.invalidate(key)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache invalidate failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Unlike the data calls, the health probe reports the failure.
    pub async fn ping(&self) -> Result<()> {
        self.bounded("ping", self.backend.ping()).await
    }
}
