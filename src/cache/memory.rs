use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use tracing::debug;

use crate::cache::{CacheKey, KvCache};
use crate::errors::Result;

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 每个条目独立 TTL，从最后一次写入开始计时，读取不续期
struct WriteTtl;

impl Expiry<String, Entry> for WriteTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache for single-instance deployments and tests.
pub struct MokaCache {
    inner: Cache<String, Entry>,
}

impl MokaCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(WriteTtl)
            .build();
        debug!("MokaCache initialized with max capacity: {}", max_capacity);
        Self { inner }
    }
}

#[async_trait]
impl KvCache for MokaCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        Ok(self.inner.get(key.as_str()).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()> {
        self.inner
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<()> {
        self.inner.invalidate(key.as_str()).await;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
