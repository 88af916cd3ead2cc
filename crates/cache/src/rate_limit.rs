//! Fixed-window request counting on top of [`Cache`].

use crate::error::Result;
use crate::redis_cache::Cache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindow {
    pub max_requests: u64,
    pub window_seconds: u64,
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    pub count: u64,
    pub allowed: bool,
    /// Seconds until the current window closes
    pub reset_in: u64,
}

impl FixedWindow {
    pub fn new(max_requests: u64, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds: window_seconds.max(1),
        }
    }

    /// Counter key for a client in the window containing `now` (unix seconds)
    pub fn key(&self, identifier: &str, now: u64) -> String {
        format!("ratelimit:{}:{}", identifier, now / self.window_seconds)
    }

    pub fn evaluate(&self, count: u64, now: u64) -> WindowHit {
        WindowHit {
            count,
            allowed: count <= self.max_requests,
            reset_in: self.window_seconds - (now % self.window_seconds),
        }
    }

    pub async fn hit(&self, cache: &Cache, identifier: &str, now: u64) -> Result<WindowHit> {
        let count = cache
            .incr_with_ttl(&self.key(identifier, now), self.window_seconds)
            .await?;
        Ok(self.evaluate(count.max(0) as u64, now))
    }
}
