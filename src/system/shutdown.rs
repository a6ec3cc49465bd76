use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, info};

use super::startup::StartupContext;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Release process-wide resources after the server has stopped.
pub async fn shutdown(ctx: &StartupContext) {
    info!("Shutting down, closing store connections...");

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), ctx.store.close()).await {
        Ok(Ok(())) => info!("Store closed"),
        Ok(Err(e)) => error!("Failed to close store: {}", e),
        Err(_) => error!(
            "Closing the store timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }

    info!("Shutdown complete");
}
