use tigger_auth::SessionConfig;
use tigger_cache::CacheConfig;
use tigger_database::DatabaseConfig;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u64,
    pub window_seconds: u64,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_parse("RATE_LIMIT_ENABLED", true),
            max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", 100),
            window_seconds: env_parse("RATE_LIMIT_WINDOW_SECONDS", 15 * 60),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Fails only when no session key material is configured.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env_parse("SERVER_PORT", 8000),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            session: SessionConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env(),
            cors_allowed_origins: parse_origins(
                &std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            log_format: LogFormat::parse(&std::env::var("LOG_FORMAT").unwrap_or_default()),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
