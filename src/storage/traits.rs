use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::{AccessRecord, AccessStats, ShortLink};

/// Durable store for links and the access log.
///
/// Every call is atomic for a single record. Implementations report an
/// unreachable or slow backend as `StoreUnavailable` and never retry.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a new link. `DuplicateCode` if the code already exists.
    async fn insert(&self, link: &ShortLink) -> Result<String>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>>;

    /// Newest first.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>>;

    /// Change the code of `(id, owner_id)`; the record becomes custom.
    ///
    /// `AliasTaken` if another record holds `new_code`, `NotFound` if no
    /// record matches both id and owner.
    async fn rename(&self, id: &str, owner_id: &str, new_code: &str) -> Result<()>;

    /// `NotFound` if no record matches both id and owner.
    async fn delete(&self, id: &str, owner_id: &str) -> Result<()>;

    async fn record_access(&self, access: &AccessRecord) -> Result<()>;

    async fn access_stats(&self, code: &str) -> Result<AccessStats>;

    async fn count_links(&self) -> Result<u64>;

    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &str;
}
