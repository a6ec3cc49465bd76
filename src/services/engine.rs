//! Resolution / shorten engine
//!
//! Orchestrates validation, code generation, the durable store and the
//! cache. The store is authoritative; the cache is only ever populated from
//! it and invalidated before the store changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheKey, CacheLayer};
use crate::config::StaticConfig;
use crate::errors::{QuicklinkError, Result};
use crate::storage::{AccessRecord, AccessStats, LinkStore, ShortLink};
use crate::utils::{
    CodeGenerator, is_reserved_alias, normalize_url, validate_alias, validate_url,
};

// ============ Request/Response DTOs ============

#[derive(Debug, Clone, Default)]
pub struct ShortenRequest {
    pub url: String,
    pub owner_id: Option<String>,
    pub custom_alias: Option<String>,
    /// Overrides the configured frontend base for the returned short URL.
    pub frontend_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenResult {
    pub id: String,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    /// An existing link for the same URL and owner was returned.
    pub reused: bool,
}

/// Owner listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub full_short_url: String,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Default base for the link returned by shorten.
    pub frontend_url: String,
    /// Base for `full_short_url` in listings.
    pub base_url: String,
    pub max_generate_attempts: u32,
}

impl EngineSettings {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            frontend_url: config.server.frontend_url.clone(),
            base_url: config.server.base_url.clone(),
            max_generate_attempts: config.shorten.max_generate_attempts,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&StaticConfig::default())
    }
}

fn join_short_url(base: &str, code: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), code)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Aliases are taken verbatim: only an absent or empty alias counts as none,
/// anything else goes to the validator untouched.
fn supplied_alias(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn require_owner(owner_id: &str) -> Result<&str> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(QuicklinkError::missing_user_id("User ID is required"));
    }
    Ok(owner_id)
}

/// 与固定路由同名的别名永远无法跳转
fn reject_reserved(alias: &str) -> Result<()> {
    if is_reserved_alias(alias) {
        return Err(QuicklinkError::alias_taken("Custom alias already taken"));
    }
    Ok(())
}

fn not_found_or_unauthorized() -> QuicklinkError {
    QuicklinkError::not_found("URL not found or unauthorized")
}

// ============ LinkEngine ============

pub struct LinkEngine {
    store: Arc<dyn LinkStore>,
    cache: CacheLayer,
    generator: CodeGenerator,
    settings: EngineSettings,
}

impl LinkEngine {
    pub fn new(store: Arc<dyn LinkStore>, cache: CacheLayer, settings: EngineSettings) -> Self {
        Self {
            store,
            cache,
            generator: CodeGenerator::new(),
            settings,
        }
    }

    /// Create a short link for `req.url`.
    #[instrument(skip(self, req), fields(owner = ?req.owner_id, alias = ?req.custom_alias))]
    pub async fn shorten(&self, req: ShortenRequest) -> Result<ShortenResult> {
        let raw_url = req.url.trim();
        if raw_url.is_empty() {
            return Err(QuicklinkError::missing_url("URL is required"));
        }
        validate_url(raw_url).map_err(|e| QuicklinkError::invalid_url(e.to_string()))?;
        let original_url = normalize_url(raw_url);

        let owner_id = non_empty(req.owner_id.as_deref()).map(str::to_string);
        let dedup_key = CacheKey::dedup(&original_url, owner_id.as_deref());
        let base = non_empty(req.frontend_base_url.as_deref())
            .unwrap_or(&self.settings.frontend_url)
            .to_string();

        let (link, reused) = match supplied_alias(req.custom_alias.as_deref()) {
            Some(alias) => (
                self.insert_custom(alias, &original_url, owner_id).await?,
                false,
            ),
            None => match self.reusable_link(&dedup_key, &original_url, owner_id.as_deref()).await? {
                Some(existing) => (existing, true),
                None => (self.insert_generated(&original_url, owner_id).await?, false),
            },
        };

        self.cache.set(&dedup_key, &link.code).await;

        if reused {
            debug!("Reused existing link '{}' -> '{}'", link.code, link.original_url);
        } else {
            info!("Shortened '{}' -> '{}'", link.code, link.original_url);
        }

        Ok(ShortenResult {
            short_url: join_short_url(&base, &link.code),
            id: link.id,
            code: link.code,
            original_url: link.original_url,
            reused,
        })
    }

    async fn insert_custom(
        &self,
        alias: &str,
        original_url: &str,
        owner_id: Option<String>,
    ) -> Result<ShortLink> {
        validate_alias(alias)?;
        reject_reserved(alias)?;

        if self.store.find_by_code(alias).await?.is_some() {
            return Err(QuicklinkError::alias_taken("Custom alias already taken"));
        }

        let link = ShortLink::new(alias, original_url, owner_id, true);
        match self.store.insert(&link).await {
            Ok(_) => Ok(link),
            // 检查与插入之间被抢注
            Err(QuicklinkError::DuplicateCode(_)) => {
                Err(QuicklinkError::alias_taken("Custom alias already taken"))
            }
            Err(e) => Err(e),
        }
    }

    /// A previous auto-generated link for the same URL and owner, if the
    /// dedup entry still points at one.
    async fn reusable_link(
        &self,
        dedup_key: &CacheKey,
        original_url: &str,
        owner_id: Option<&str>,
    ) -> Result<Option<ShortLink>> {
        let Some(code) = self.cache.get(dedup_key).await else {
            return Ok(None);
        };

        match self.store.find_by_code(&code).await? {
            Some(link)
                if !link.is_custom
                    && link.original_url == original_url
                    && link.owner_id.as_deref() == owner_id =>
            {
                Ok(Some(link))
            }
            _ => {
                debug!("Stale dedup entry {} -> '{}'", dedup_key, code);
                Ok(None)
            }
        }
    }

    async fn insert_generated(
        &self,
        original_url: &str,
        owner_id: Option<String>,
    ) -> Result<ShortLink> {
        let code = self.free_code(original_url, false).await?;
        let link = ShortLink::new(code, original_url, owner_id.clone(), false);

        match self.store.insert(&link).await {
            Ok(_) => return Ok(link),
            Err(QuicklinkError::DuplicateCode(msg)) => {
                warn!("Insert race on '{}' ({}), retrying with a salted code", link.code, msg);
            }
            Err(e) => return Err(e),
        }

        // 仅重试一次
        let code = self.free_code(original_url, true).await?;
        let link = ShortLink::new(code, original_url, owner_id, false);
        match self.store.insert(&link).await {
            Ok(_) => Ok(link),
            Err(QuicklinkError::DuplicateCode(msg)) => Err(QuicklinkError::database_operation(
                format!("Failed to insert link after duplicate-code retry: {}", msg),
            )),
            Err(e) => Err(e),
        }
    }

    /// First candidate not present in the store. The unsalted candidate is
    /// tried first unless `salted_only`.
    async fn free_code(&self, original_url: &str, salted_only: bool) -> Result<String> {
        let attempts = self.settings.max_generate_attempts.max(1);

        for attempt in 0..attempts {
            let code = if attempt == 0 && !salted_only {
                self.generator.generate(original_url)
            } else {
                self.generator.generate_salted(original_url)
            };

            if self.store.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            debug!("Generated code '{}' is taken (attempt {})", code, attempt + 1);
        }

        Err(QuicklinkError::code_space_exhausted(format!(
            "No free code found after {} attempts",
            attempts
        )))
    }

    /// Original URL for `code`. Records the access on success.
    #[instrument(skip(self, client_agent, client_address))]
    pub async fn resolve(
        &self,
        code: &str,
        client_agent: Option<String>,
        client_address: Option<String>,
    ) -> Result<String> {
        let key = CacheKey::resolve(code);

        let original_url = match self.cache.get(&key).await {
            Some(url) => {
                debug!("Cache hit for '{}'", code);
                url
            }
            None => {
                debug!("Cache miss for '{}'", code);
                let link = self
                    .store
                    .find_by_code(code)
                    .await?
                    .ok_or_else(|| QuicklinkError::not_found("URL not found"))?;
                self.cache.set(&key, &link.original_url).await;
                link.original_url
            }
        };

        self.record_access(code, client_agent, client_address).await;
        Ok(original_url)
    }

    async fn record_access(
        &self,
        code: &str,
        client_agent: Option<String>,
        client_address: Option<String>,
    ) {
        let record = AccessRecord::now(code, client_agent, client_address);
        if let Err(e) = self.store.record_access(&record).await {
            warn!("Failed to record access for '{}': {}", code, e);
        }
    }

    /// Change the code of the owner's link `id` to `new_alias`.
    #[instrument(skip(self))]
    pub async fn rename(
        &self,
        id: &str,
        owner_id: &str,
        new_alias: Option<&str>,
    ) -> Result<ShortLink> {
        let owner_id = require_owner(owner_id)?;
        let alias = supplied_alias(new_alias)
            .ok_or_else(|| QuicklinkError::no_changes("No changes provided"))?;
        validate_alias(alias)?;
        reject_reserved(alias)?;

        let mut link = self
            .store
            .find_by_id(id)
            .await?
            .filter(|link| link.is_owned_by(owner_id))
            .ok_or_else(not_found_or_unauthorized)?;

        if link.code == alias {
            return Ok(link);
        }

        self.store.rename(id, owner_id, alias).await?;

        let old_code = std::mem::replace(&mut link.code, alias.to_string());
        link.is_custom = true;
        self.cache.invalidate(&CacheKey::resolve(&old_code)).await;
        self.cache
            .invalidate(&CacheKey::dedup(&link.original_url, link.owner_id.as_deref()))
            .await;

        info!("Renamed '{}' -> '{}'", old_code, link.code);
        Ok(link)
    }

    /// Delete the owner's link `id`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let owner_id = require_owner(owner_id)?;

        let link = self
            .store
            .find_by_id(id)
            .await?
            .filter(|link| link.is_owned_by(owner_id))
            .ok_or_else(not_found_or_unauthorized)?;

        // 先失效缓存，再删除存储
        self.cache.invalidate(&CacheKey::resolve(&link.code)).await;
        self.cache
            .invalidate(&CacheKey::dedup(&link.original_url, link.owner_id.as_deref()))
            .await;

        self.store.delete(id, owner_id).await?;

        info!("Deleted '{}' ({})", link.code, id);
        Ok(())
    }

    /// Access stats for `code`, visible only to its owner.
    #[instrument(skip(self))]
    pub async fn analytics(&self, code: &str, owner_id: &str) -> Result<AccessStats> {
        let owner_id = require_owner(owner_id)?;

        let link = self
            .store
            .find_by_code(code)
            .await?
            .ok_or_else(|| QuicklinkError::not_found("URL not found"))?;

        if !link.is_owned_by(owner_id) {
            return Err(QuicklinkError::unauthorized("Unauthorized access"));
        }

        self.store.access_stats(code).await
    }

    /// The owner's links, newest first.
    #[instrument(skip(self))]
    pub async fn list_owner_links(&self, owner_id: &str) -> Result<Vec<LinkView>> {
        let owner_id = require_owner(owner_id)?;

        let links = self.store.find_by_owner(owner_id).await?;
        Ok(links
            .into_iter()
            .map(|link| LinkView {
                full_short_url: join_short_url(&self.settings.base_url, &link.code),
                id: link.id,
                code: link.code,
                original_url: link.original_url,
                created_at: link.created_at,
                is_custom: link.is_custom,
            })
            .collect())
    }
}
