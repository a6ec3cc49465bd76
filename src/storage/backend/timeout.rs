//! Bounded store calls
//!
//! Every database round trip goes through [`with_timeout`]. An elapsed
//! deadline and a lost connection both surface as `StoreUnavailable`; the
//! caller decides whether to retry the whole request.

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tracing::warn;

use crate::errors::{QuicklinkError, Result};

pub async fn with_timeout<T, Fut>(operation_name: &str, timeout: Duration, operation: Fut) -> Result<T>
where
    Fut: Future<Output = std::result::Result<T, DbErr>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            let err = QuicklinkError::from(e);
            if err.is_transient() {
                warn!("Store operation '{}' failed: {}", operation_name, err);
            }
            Err(err)
        }
        Err(_elapsed) => {
            warn!(
                "Store operation '{}' timed out after {}ms",
                operation_name,
                timeout.as_millis()
            );
            Err(QuicklinkError::store_unavailable(format!(
                "Operation '{}' timed out after {}ms",
                operation_name,
                timeout.as_millis()
            )))
        }
    }
}

/// Unique index hit (duplicate code).
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
