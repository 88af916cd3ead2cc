pub mod auth;
pub mod rate_limit;

pub use auth::require_session;
pub use rate_limit::{rate_limit_api, RateLimiter};
