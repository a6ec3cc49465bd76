use std::sync::{Arc, OnceLock};

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// The global configuration, or `None` before [`init_config`] /
/// [`init_config_with`] ran.
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().cloned()
}

/// Initialize the global configuration from `config.toml` (if present) and
/// the environment. Later calls are no-ops and return the first value.
pub fn init_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    if let Some(existing) = CONFIG.get() {
        return Ok(existing.clone());
    }
    let loaded = StaticConfig::load(path)?;
    Ok(init_config_with(loaded))
}

/// Install an already-built configuration (tests, embedding).
pub fn init_config_with(config: StaticConfig) -> Arc<StaticConfig> {
    CONFIG.get_or_init(|| Arc::new(config)).clone()
}
