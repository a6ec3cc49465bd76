//! Read-only link queries

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::trace;

use super::SeaOrmStore;
use super::converters::model_to_shortlink;
use super::timeout::with_timeout;
use crate::errors::Result;
use crate::storage::ShortLink;

use migration::entities::link;

impl SeaOrmStore {
    pub async fn get_by_code(&self, code: &str) -> Result<Option<ShortLink>> {
        let model = with_timeout(
            "find_by_code",
            self.timeout,
            link::Entity::find()
                .filter(link::Column::Code.eq(code))
                .one(&self.db),
        )
        .await?;

        trace!("find_by_code({}) -> {}", code, model.is_some());
        Ok(model.map(model_to_shortlink))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<ShortLink>> {
        let model = with_timeout(
            "find_by_id",
            self.timeout,
            link::Entity::find_by_id(id.to_string()).one(&self.db),
        )
        .await?;
        Ok(model.map(model_to_shortlink))
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        let models = with_timeout(
            "find_by_owner",
            self.timeout,
            link::Entity::find()
                .filter(link::Column::OwnerId.eq(owner_id))
                .order_by_desc(link::Column::CreatedAt)
                .all(&self.db),
        )
        .await?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        with_timeout("count", self.timeout, link::Entity::find().count(&self.db)).await
    }

    /// Whether a record other than `exclude_id` already uses `code`.
    pub(super) async fn code_taken_by_other(&self, code: &str, exclude_id: &str) -> Result<bool> {
        let found = with_timeout(
            "code_taken_by_other",
            self.timeout,
            link::Entity::find()
                .filter(link::Column::Code.eq(code))
                .filter(link::Column::Id.ne(exclude_id))
                .one(&self.db),
        )
        .await?;
        Ok(found.is_some())
    }
}
