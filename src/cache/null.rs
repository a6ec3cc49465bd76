use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{CacheKey, KvCache};
use crate::errors::Result;

/// Cache disabled: every read misses, every write is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

#[async_trait]
impl KvCache for NullCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn invalidate(&self, _key: &CacheKey) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
