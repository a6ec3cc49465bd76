use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, trace, warn};

use crate::cache::CacheLayer;
use crate::storage::LinkStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Store reachable, cache not.
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: ComponentHealth,
    pub cache: ComponentHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u128,
}

impl HealthReport {
    /// The service can answer requests (possibly without cache).
    pub fn is_serving(&self) -> bool {
        self.status != HealthStatus::Unhealthy
    }
}

pub struct HealthService {
    store: Arc<dyn LinkStore>,
    cache: CacheLayer,
    started_at: DateTime<Utc>,
}

impl HealthService {
    pub fn new(store: Arc<dyn LinkStore>, cache: CacheLayer) -> Self {
        Self {
            store,
            cache,
            started_at: Utc::now(),
        }
    }

    pub async fn check(&self) -> HealthReport {
        let start_time = Instant::now();
        trace!("Running health check");

        let store = self.check_store().await;
        let cache = self.check_cache().await;

        let status = match (store.status, cache.status) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
            (HealthStatus::Healthy, _) => HealthStatus::Degraded,
            _ => HealthStatus::Unhealthy,
        };

        let now = Utc::now();
        let uptime = (now - self.started_at).num_seconds().max(0) as u64;

        info!(
            "Health check completed in {:?}, status: {:?}",
            start_time.elapsed(),
            status
        );

        HealthReport {
            status,
            timestamp: now,
            uptime,
            checks: HealthChecks { store, cache },
            response_time_ms: start_time.elapsed().as_millis(),
        }
    }

    async fn check_store(&self) -> ComponentHealth {
        let backend = self.store.backend_name().to_string();

        let result = match self.store.ping().await {
            Ok(()) => self.store.count_links().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(count) => ComponentHealth {
                status: HealthStatus::Healthy,
                backend,
                links_count: Some(count),
                error: None,
            },
            Err(e) => {
                error!("Store health check failed: {}", e);
                ComponentHealth {
                    status: HealthStatus::Unhealthy,
                    backend,
                    links_count: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn check_cache(&self) -> ComponentHealth {
        let backend = self.cache.backend_name().to_string();

        match self.cache.ping().await {
            Ok(()) => ComponentHealth {
                status: HealthStatus::Healthy,
                backend,
                links_count: None,
                error: None,
            },
            Err(e) => {
                warn!("Cache health check failed: {}", e);
                ComponentHealth {
                    status: HealthStatus::Unhealthy,
                    backend,
                    links_count: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
