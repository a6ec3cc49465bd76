//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::RwLock;

use quicklink::cache::{CacheKey, CacheLayer, KvCache};
use quicklink::config::DatabaseConfig;
use quicklink::errors::{QuicklinkError, Result};
use quicklink::services::{EngineSettings, LinkEngine};
use quicklink::storage::{AccessRecord, AccessStats, LinkStore, SeaOrmStore, ShortLink};

// =============================================================================
// Store
// =============================================================================

/// SQLite store in a fresh temp dir. Keep the `TempDir` alive for the test.
pub async fn create_test_store() -> (Arc<SeaOrmStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("quicklink_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let config = DatabaseConfig {
        database_url: db_url.clone(),
        ..Default::default()
    };
    let store = SeaOrmStore::new(&db_url, "sqlite", &config)
        .await
        .expect("Failed to create store");

    (Arc::new(store), temp_dir)
}

/// Wraps a real store and injects failures on demand.
pub struct FlakyStore {
    inner: Arc<SeaOrmStore>,
    /// Number of upcoming inserts to reject with `DuplicateCode`.
    pub duplicate_inserts: AtomicU32,
    pub fail_access_log: AtomicBool,
    pub unavailable: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<SeaOrmStore>) -> Self {
        Self {
            inner,
            duplicate_inserts: AtomicU32::new(0),
            fail_access_log: AtomicBool::new(false),
            unavailable: AtomicBool::new(false),
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QuicklinkError::store_unavailable(
                "Operation timed out after 3000ms",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkStore for FlakyStore {
    async fn insert(&self, link: &ShortLink) -> Result<String> {
        self.check_available()?;
        let pending = self.duplicate_inserts.load(Ordering::SeqCst);
        if pending > 0 {
            self.duplicate_inserts.store(pending - 1, Ordering::SeqCst);
            return Err(QuicklinkError::duplicate_code(format!(
                "Code '{}' already exists",
                link.code
            )));
        }
        self.inner.insert(link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>> {
        self.check_available()?;
        self.inner.find_by_code(code).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>> {
        self.check_available()?;
        self.inner.find_by_id(id).await
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        self.check_available()?;
        self.inner.find_by_owner(owner_id).await
    }

    async fn rename(&self, id: &str, owner_id: &str, new_code: &str) -> Result<()> {
        self.check_available()?;
        self.inner.rename(id, owner_id, new_code).await
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        self.check_available()?;
        self.inner.delete(id, owner_id).await
    }

    async fn record_access(&self, access: &AccessRecord) -> Result<()> {
        if self.fail_access_log.load(Ordering::SeqCst) {
            return Err(QuicklinkError::database_operation("accesses table is locked"));
        }
        self.inner.record_access(access).await
    }

    async fn access_stats(&self, code: &str) -> Result<AccessStats> {
        self.check_available()?;
        self.inner.access_stats(code).await
    }

    async fn count_links(&self) -> Result<u64> {
        self.check_available()?;
        self.inner.count_links().await
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()?;
        self.inner.ping().await
    }

    fn backend_name(&self) -> &str {
        "flaky"
    }
}

// =============================================================================
// Caches
// =============================================================================

/// In-memory cache that remembers what was written and invalidated.
#[derive(Default)]
pub struct RecordingCache {
    pub data: RwLock<HashMap<String, String>>,
    pub invalidated: RwLock<Vec<String>>,
}

impl RecordingCache {
    pub async fn peek(&self, key: &CacheKey) -> Option<String> {
        self.data.read().await.get(key.as_str()).cloned()
    }

    pub async fn put(&self, key: &CacheKey, value: &str) {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn was_invalidated(&self, key: &CacheKey) -> bool {
        self.invalidated
            .read()
            .await
            .iter()
            .any(|k| k == key.as_str())
    }
}

#[async_trait]
impl KvCache for RecordingCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        Ok(self.data.read().await.get(key.as_str()).cloned())
    }

    async fn set(&self, key: &CacheKey, value: &str, _ttl: Duration) -> Result<()> {
        self.put(key, value).await;
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<()> {
        self.data.write().await.remove(key.as_str());
        self.invalidated.write().await.push(key.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Cache whose every call fails, as if Redis went away.
pub struct FailingCache;

#[async_trait]
impl KvCache for FailingCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>> {
        Err(QuicklinkError::cache_connection("Connection refused"))
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: Duration) -> Result<()> {
        Err(QuicklinkError::cache_connection("Connection refused"))
    }

    async fn invalidate(&self, _key: &CacheKey) -> Result<()> {
        Err(QuicklinkError::cache_connection("Connection refused"))
    }

    async fn ping(&self) -> Result<()> {
        Err(QuicklinkError::cache_connection("Connection refused"))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Cache that never answers in time.
pub struct HangingCache;

#[async_trait]
impl KvCache for HangingCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: Duration) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn invalidate(&self, _key: &CacheKey) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "hanging"
    }
}

pub fn cache_layer(cache: Arc<dyn KvCache>) -> CacheLayer {
    CacheLayer::new(cache, Duration::from_secs(3600), Duration::from_millis(100))
}

pub fn create_engine(store: Arc<dyn LinkStore>, cache: Arc<dyn KvCache>) -> LinkEngine {
    LinkEngine::new(store, cache_layer(cache), EngineSettings::default())
}

pub fn is_hex_code(code: &str) -> bool {
    code.len() == 8 && code.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
