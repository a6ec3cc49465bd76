//! Append-only access log

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStore;
use super::converters::{access_to_active_model, model_to_access};
use super::timeout::with_timeout;
use crate::errors::Result;
use crate::storage::{AccessRecord, AccessStats};

use migration::entities::access;

impl SeaOrmStore {
    pub async fn append_access(&self, record: &AccessRecord) -> Result<()> {
        with_timeout(
            "record_access",
            self.timeout,
            access::Entity::insert(access_to_active_model(record)).exec(&self.db),
        )
        .await?;
        Ok(())
    }

    pub async fn stats_for_code(&self, code: &str) -> Result<AccessStats> {
        let models = with_timeout(
            "access_stats",
            self.timeout,
            access::Entity::find()
                .filter(access::Column::Code.eq(code))
                .order_by_asc(access::Column::AccessedAt)
                .order_by_asc(access::Column::Id)
                .all(&self.db),
        )
        .await?;

        let records: Vec<AccessRecord> = models.into_iter().map(model_to_access).collect();
        Ok(AccessStats {
            total_clicks: records.len() as u64,
            records,
        })
    }
}
