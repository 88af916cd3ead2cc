use crate::error::Result;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL").unwrap_or_else(|_| Self::default().url),
        }
    }
}

#[derive(Clone)]
pub struct Cache {
    manager: ConnectionManager,
}

impl Cache {
    pub async fn new(config: CacheConfig) -> Result<Self> {
        let client = Client::open(config.url)?;
        let manager = ConnectionManager::new(client).await?;

        Ok(Self { manager })
    }

    /// Increment a counter, setting its TTL when the key is created.
    pub async fn incr_with_ttl(&self, key: &str, ttl_seconds: u64) -> Result<i64> {
        let mut conn = self.manager.clone();
        let value: i64 = conn.incr(key, 1).await?;
        if value == 1 {
            conn.expire::<_, ()>(key, ttl_seconds as i64).await?;
        }
        Ok(value)
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    /// Ping Redis to check connection
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }
}
