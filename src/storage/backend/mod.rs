//! SeaORM storage backend
//!
//! Links and the access log on SQLite, MySQL/MariaDB or PostgreSQL.

mod access_log;
mod connection;
mod converters;
mod mutations;
mod query;
pub mod timeout;

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{QuicklinkError, Result};
use crate::storage::{AccessRecord, AccessStats, LinkStore, ShortLink};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_shortlink, shortlink_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(QuicklinkError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite:, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based store
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
    timeout: Duration,
}

impl SeaOrmStore {
    pub async fn new(database_url: &str, backend_name: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.is_empty() {
            return Err(QuicklinkError::database_config("DATABASE_URL is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size).await?
        };

        run_migrations(&db).await?;

        info!("{} store initialized", backend_name.to_uppercase());
        Ok(SeaOrmStore {
            db,
            backend_name: backend_name.to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Close the underlying pool. Further calls fail as `StoreUnavailable`.
    pub async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| QuicklinkError::database_connection(e.to_string()))?;
        info!("{} store closed", self.backend_name.to_uppercase());
        Ok(())
    }
}

#[async_trait]
impl LinkStore for SeaOrmStore {
    async fn insert(&self, link: &ShortLink) -> Result<String> {
        self.insert_link(link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>> {
        self.get_by_code(code).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>> {
        self.get_by_id(id).await
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        self.list_by_owner(owner_id).await
    }

    async fn rename(&self, id: &str, owner_id: &str, new_code: &str) -> Result<()> {
        self.rename_code(id, owner_id, new_code).await
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        self.remove(id, owner_id).await
    }

    async fn record_access(&self, access: &AccessRecord) -> Result<()> {
        self.append_access(access).await
    }

    async fn access_stats(&self, code: &str) -> Result<AccessStats> {
        self.stats_for_code(code).await
    }

    async fn count_links(&self) -> Result<u64> {
        self.count().await
    }

    async fn ping(&self) -> Result<()> {
        timeout::with_timeout("ping", self.timeout, self.db.ping()).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
