use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, info, trace, warn};

use crate::cache::{CacheKey, KvCache};
use crate::config::RedisConfig;
use crate::errors::{QuicklinkError, Result};

pub struct RedisCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisCache {
    /// Connect and PING, retrying up to `connect_attempts` times with a fixed
    /// delay in between. Exhausting the attempts is fatal for startup.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let url = config.url();
        let client = redis::Client::open(url.as_str()).map_err(|e| {
            QuicklinkError::cache_connection(format!("Invalid Redis URL '{}': {}", url, e))
        })?;

        let attempts = config.connect_attempts.max(1);
        let delay = Duration::from_millis(config.connect_retry_delay_ms);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match Self::open_and_ping(&client).await {
                Ok(conn) => {
                    info!(
                        "Connected to Redis at {} (attempt {}/{})",
                        url, attempt, attempts
                    );
                    return Ok(Self {
                        client,
                        connection: Arc::new(RwLock::new(Some(conn))),
                        key_prefix: config.key_prefix.clone(),
                    });
                }
                Err(e) => {
                    warn!(
                        "Redis connection attempt {}/{} to {} failed: {}",
                        attempt, attempts, url, e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        error!("Giving up on Redis at {} after {} attempts", url, attempts);
        Err(QuicklinkError::cache_connection(format!(
            "Failed to connect to Redis at {} after {} attempts: {}",
            url, attempts, last_error
        )))
    }

    async fn open_and_ping(
        client: &redis::Client,
    ) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Redis PING -> {}", pong);
        Ok(conn)
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection re-established");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    /// Run `op` on a pooled connection; any Redis error drops the cached
    /// connection so the next call reconnects.
    async fn with_connection<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: std::future::Future<Output = redis::RedisResult<T>>,
    {
        let conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        match op(conn).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    fn make_key(&self, key: &CacheKey) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KvCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let redis_key = self.make_key(key);
        let value: Option<String> = self
            .with_connection(|mut conn| async move { conn.get(redis_key).await })
            .await?;
        trace!("Redis GET {} -> hit={}", key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()> {
        let redis_key = self.make_key(key);
        let value = value.to_string();
        // Redis 的 SETEX 最小粒度为 1 秒
        let seconds = ttl.as_secs().max(1);
        self.with_connection(|mut conn| async move {
            conn.set_ex::<_, _, ()>(redis_key, value, seconds).await
        })
        .await?;
        trace!("Redis SETEX {} ({}s)", key, seconds);
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<()> {
        let redis_key = self.make_key(key);
        let deleted: i64 = self
            .with_connection(|mut conn| async move { conn.del(redis_key).await })
            .await?;
        trace!("Redis DEL {} -> {}", key, deleted);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let _: String = self
            .with_connection(|mut conn| async move {
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_gives_up_after_bounded_attempts() {
        // 端口 1 上不会有 Redis
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            key_prefix: "test:".to_string(),
            connect_attempts: 2,
            connect_retry_delay_ms: 10,
        };

        let err = match RedisCache::connect(&config).await {
            Ok(_) => panic!("connect should fail without a server"),
            Err(e) => e,
        };
        assert!(matches!(err, QuicklinkError::CacheConnection(_)));
        assert!(err.message().contains("after 2 attempts"));
    }
}
