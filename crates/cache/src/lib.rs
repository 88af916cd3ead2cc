pub mod error;
pub mod rate_limit;
pub mod redis_cache;

pub use error::{CacheError, Result};
pub use rate_limit::{FixedWindow, WindowHit};
pub use redis_cache::{Cache, CacheConfig};
