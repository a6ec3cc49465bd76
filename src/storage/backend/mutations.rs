//! Write operations on links

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
use tracing::{info, warn};

use super::SeaOrmStore;
use super::converters::shortlink_to_active_model;
use super::timeout::{is_unique_violation, with_timeout};
use crate::errors::{QuicklinkError, Result};
use crate::storage::ShortLink;

use migration::entities::link;

impl SeaOrmStore {
    pub async fn insert_link(&self, new_link: &ShortLink) -> Result<String> {
        let active_model = shortlink_to_active_model(new_link);

        let result = tokio::time::timeout(
            self.timeout,
            link::Entity::insert(active_model).exec(&self.db),
        )
        .await;

        match result {
            Ok(Ok(_)) => {
                info!("Short link inserted: {} -> {}", new_link.code, new_link.original_url);
                Ok(new_link.id.clone())
            }
            Ok(Err(e)) if is_unique_violation(&e) => {
                warn!("Insert lost the race for code '{}'", new_link.code);
                Err(QuicklinkError::duplicate_code(format!(
                    "Code '{}' already exists",
                    new_link.code
                )))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(QuicklinkError::store_unavailable(format!(
                "Operation 'insert' timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    pub async fn rename_code(&self, id: &str, owner_id: &str, new_code: &str) -> Result<()> {
        if self.code_taken_by_other(new_code, id).await? {
            return Err(QuicklinkError::alias_taken(format!(
                "Custom alias '{}' already taken",
                new_code
            )));
        }

        let result = tokio::time::timeout(
            self.timeout,
            link::Entity::update_many()
                .col_expr(link::Column::Code, Expr::value(new_code.to_string()))
                .col_expr(link::Column::IsCustom, Expr::value(true))
                .filter(link::Column::Id.eq(id))
                .filter(link::Column::OwnerId.eq(owner_id))
                .exec(&self.db),
        )
        .await;

        let updated = match result {
            Ok(Ok(res)) => res.rows_affected,
            // 检查与更新之间被其他请求抢占
            Ok(Err(e)) if is_unique_violation(&e) => {
                return Err(QuicklinkError::alias_taken(format!(
                    "Custom alias '{}' already taken",
                    new_code
                )));
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(QuicklinkError::store_unavailable(format!(
                    "Operation 'rename' timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
        };

        if updated == 0 {
            return Err(QuicklinkError::not_found(
                "URL not found or unauthorized".to_string(),
            ));
        }

        info!("Short link {} renamed to '{}'", id, new_code);
        Ok(())
    }

    pub async fn remove(&self, id: &str, owner_id: &str) -> Result<()> {
        let result = with_timeout(
            "delete",
            self.timeout,
            link::Entity::delete_many()
                .filter(link::Column::Id.eq(id))
                .filter(link::Column::OwnerId.eq(owner_id))
                .exec(&self.db),
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(QuicklinkError::not_found(
                "URL not found or unauthorized".to_string(),
            ));
        }

        info!("Short link deleted: {}", id);
        Ok(())
    }
}
