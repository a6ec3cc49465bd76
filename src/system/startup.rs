use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cache::{CacheFactory, CacheLayer};
use crate::config::StaticConfig;
use crate::services::{EngineSettings, HealthService, LinkEngine};
use crate::storage::{LinkStore, SeaOrmStore, StoreFactory};

/// Process-wide resources, built once and shared by every worker.
pub struct StartupContext {
    pub store: Arc<SeaOrmStore>,
    pub cache: CacheLayer,
    pub engine: Arc<LinkEngine>,
    pub health: Arc<HealthService>,
}

/// Connect the store and the cache and wire up the services.
///
/// Fails if the database is unreachable or the cache connect loop runs out
/// of attempts.
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StoreFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    let backend = CacheFactory::create(&config.cache)
        .await
        .context("Failed to connect cache backend")?;
    let cache = CacheLayer::from_config(backend, &config.cache);

    let engine = Arc::new(LinkEngine::new(
        store.clone(),
        cache.clone(),
        EngineSettings::from_config(config),
    ));
    let health = Arc::new(HealthService::new(store.clone(), cache.clone()));

    info!("Startup completed in {:?}", start_time.elapsed());
    Ok(StartupContext {
        store,
        cache,
        engine,
        health,
    })
}
