use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;
mod traits;

pub use backend::{SeaOrmStore, infer_backend_from_url};
pub use models::{AccessRecord, AccessStats, ShortLink};
pub use traits::LinkStore;

pub struct StoreFactory;

impl StoreFactory {
    /// Connect to the configured database and run migrations.
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStore>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let store = SeaOrmStore::new(&config.database_url, &backend_type, config).await?;
        Ok(Arc::new(store))
    }
}
