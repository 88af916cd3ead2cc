// Tigger API Server
// Project, task and comment management for multi-tenant workspaces

mod config;
mod error;
mod extract;
mod handlers;
mod middleware;
mod routes;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use config::{Config, LogFormat};
use dotenvy::dotenv;
use middleware::RateLimiter;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tigger_auth::SessionVerifier;
use tigger_cache::FixedWindow;
use tigger_database::{
    CalendarRepository, CommentRepository, Database, ProjectRepository, TaskRepository,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

pub struct AppState {
    pub projects: ProjectRepository,
    pub tasks: TaskRepository,
    pub comments: CommentRepository,
    pub calendar: CalendarRepository,
    pub sessions: Arc<SessionVerifier>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(pool: PgPool, sessions: SessionVerifier, rate_limiter: Option<RateLimiter>) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            calendar: CalendarRepository::new(pool),
            sessions: Arc::new(sessions),
            rate_limiter: rate_limiter.map(Arc::new),
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tigger_api=debug,tower_http=debug"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn connect_rate_limiter(config: &Config) -> Option<RateLimiter> {
    if !config.rate_limit.enabled {
        tracing::info!("⏱️  Rate limiting disabled");
        return None;
    }

    tracing::info!("⚡ Connecting to Redis...");
    let cache = match tigger_cache::Cache::new(config.cache.clone()).await {
        Ok(cache) => cache,
        Err(e) => {
            tracing::warn!("Redis unavailable, rate limiting disabled: {}", e);
            return None;
        }
    };
    if let Err(e) = cache.ping().await {
        tracing::warn!("Redis ping failed, rate limiting disabled: {}", e);
        return None;
    }
    tracing::info!(
        "✅ Redis connected ({} requests / {}s per IP)",
        config.rate_limit.max_requests,
        config.rate_limit.window_seconds
    );

    Some(RateLimiter::new(
        cache,
        FixedWindow::new(config.rate_limit.max_requests, config.rate_limit.window_seconds),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    tracing::info!("🚀 Starting Tigger API Server");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("🔌 Server: {}:{}", config.server_host, config.server_port);

    // Initialize database
    tracing::info!("🗄️  Connecting to database...");
    let database = Database::new(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    database.ping().await.context("Database ping failed")?;
    tracing::info!("✅ Database connected");

    let sessions = SessionVerifier::new(&config.session)
        .context("Failed to initialize session verifier")?;
    tracing::info!("🔐 Session verifier initialized (cookie: {})", sessions.cookie_name());

    let rate_limiter = connect_rate_limiter(&config).await;

    let state = Arc::new(AppState::new(database.pool().clone(), sessions, rate_limiter));

    let app = routes::create_router(state)
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    tracing::info!("📡 Routes configured:");
    tracing::info!("   GET  /health");
    tracing::info!("   /api/projects  /api/tasks  /api/comments  /api/calendar");

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("✅ Server ready at http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
