use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Flat environment variables honoured on top of the `QL__` tree.
///
/// These are the names existing deployments already export, so they win
/// over both the TOML file and the prefixed variables.
pub const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.database_url"),
    ("REDIS_HOST", "cache.redis.host"),
    ("REDIS_PORT", "cache.redis.port"),
    ("BASE_URL", "server.base_url"),
    ("FRONTEND_URL", "server.frontend_url"),
];

/// 静态配置（启动时加载）
///
/// - server: 监听地址、短链接基础 URL
/// - database: 持久存储连接
/// - cache: 缓存后端、TTL、Redis 连接
/// - shorten: 短码生成参数
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub shorten: ShortenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：legacy ENV > QL__ ENV > config.toml > 默认值
    /// 示例：QL__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let mut builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("QL")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config = builder.build()?.try_deserialize::<StaticConfig>()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Base for `full_short_url` in owner listings.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default base for the short link returned by shorten.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// 0 = one worker per CPU
    #[serde(default)]
    pub workers: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// Upper bound for a single store call.
    #[serde(default = "default_database_timeout_ms")]
    pub timeout_ms: u64,
}

/// 缓存系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// `redis`, `memory` or `none`
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// Upper bound for a single cache call; a timeout counts as a miss.
    #[serde(default = "default_cache_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_redis_connect_attempts")]
    pub connect_attempts: u32,
    #[serde(default = "default_redis_connect_retry_delay_ms")]
    pub connect_retry_delay_ms: u64,
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_capacity")]
    pub max_capacity: u64,
}

/// 短码生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenConfig {
    /// Attempts at finding a free auto-generated code before giving up.
    #[serde(default = "default_max_generate_attempts")]
    pub max_generate_attempts: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:8501".to_string()
}

fn default_database_url() -> String {
    "sqlite://quicklink.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout_ms() -> u64 {
    3000
}

fn default_cache_backend() -> String {
    "redis".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_timeout_ms() -> u64 {
    200
}

fn default_redis_host() -> String {
    "redis".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_redis_key_prefix() -> String {
    "quicklink:".to_string()
}

fn default_redis_connect_attempts() -> u32 {
    3
}

fn default_redis_connect_retry_delay_ms() -> u64 {
    1000
}

fn default_memory_capacity() -> u64 {
    10000
}

fn default_max_generate_attempts() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            base_url: default_base_url(),
            frontend_url: default_frontend_url(),
            workers: 0,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout_ms: default_database_timeout_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            ttl_secs: default_cache_ttl(),
            timeout_ms: default_cache_timeout_ms(),
            redis: RedisConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            key_prefix: default_redis_key_prefix(),
            connect_attempts: default_redis_connect_attempts(),
            connect_retry_delay_ms: default_redis_connect_retry_delay_ms(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_memory_capacity(),
        }
    }
}

impl Default for ShortenConfig {
    fn default() -> Self {
        Self {
            max_generate_attempts: default_max_generate_attempts(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.redis.port, 6379);
        assert_eq!(config.shorten.max_generate_attempts, 5);
        assert_eq!(config.server.frontend_url, "http://localhost:8501");
        assert_eq!(config.cache.redis.url(), "redis://redis:6379/");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: StaticConfig = toml::from_str(
            r#"
            [cache]
            backend = "memory"
            ttl_secs = 60

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.backend, "memory");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.timeout_ms, 200);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.timeout_ms, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("quicklink.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[shorten]\nmax_generate_attempts = 7").unwrap();

        let config = StaticConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.shorten.max_generate_attempts, 7);
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[cache.redis]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.cache.redis.key_prefix, "quicklink:");
    }
}
