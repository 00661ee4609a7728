//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use accounts::{AccountConfig, PgAccountRepository, account_router, route_guard};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use recovery::{
    HttpEmailNotifier, PgRecoveryRepository, RecoveryConfig, router::recovery_router,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Decode a base64 environment secret into a 32-byte key
fn decode_secret(name: &str) -> anyhow::Result<[u8; 32]> {
    let b64 = env::var(name)?;
    let bytes = Engine::decode(&general_purpose::STANDARD, &b64)?;
    let mut secret = [0u8; 32];
    if bytes.len() != secret.len() {
        anyhow::bail!("{name} must decode to exactly 32 bytes");
    }
    secret.copy_from_slice(&bytes);
    Ok(secret)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,accounts=info,recovery=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions and recovery flows
    // Errors here should not prevent server startup
    let account_store_for_cleanup = PgAccountRepository::new(pool.clone());
    match account_store_for_cleanup.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    let recovery_store_for_cleanup = PgRecoveryRepository::new(pool.clone());
    match recovery_store_for_cleanup.cleanup_expired().await {
        Ok((flows, rate_limits)) => {
            tracing::info!(
                flows_deleted = flows,
                rate_limits_deleted = rate_limits,
                "Recovery cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Recovery cleanup failed, continuing anyway");
        }
    }

    // Account configuration
    let account_config = if cfg!(debug_assertions) {
        AccountConfig::development()
    } else {
        // In production, load secrets from environment
        AccountConfig {
            session_secret: decode_secret("SESSION_SECRET")?,
            password_pepper: env::var("PASSWORD_PEPPER").ok().map(|p| p.into_bytes()),
            ..AccountConfig::default()
        }
    };

    // Recovery configuration, sharing the password pepper
    let recovery_config = if cfg!(debug_assertions) {
        RecoveryConfig::with_random_secret()
    } else {
        RecoveryConfig {
            code_secret: decode_secret("RECOVERY_CODE_SECRET")?,
            password_pepper: account_config.password_pepper.clone(),
            ..RecoveryConfig::default()
        }
    };

    // Mail delivery API client
    let notifier = HttpEmailNotifier::new(
        env::var("MAIL_API_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8025/api/send".to_string()),
        env::var("MAIL_API_KEY").unwrap_or_default(),
        env::var("MAIL_FROM_ADDRESS").unwrap_or_else(|_| "no-reply@localhost".to_string()),
    );

    let account_store = PgAccountRepository::new(pool.clone());
    let recovery_store = PgRecoveryRepository::new(pool.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router; the route guard screens every request by path + cookie
    let app = Router::new()
        .nest("/api/accounts", account_router(account_store, account_config))
        .nest(
            "/api/recovery",
            recovery_router(recovery_store, notifier, recovery_config),
        )
        .layer(axum::middleware::from_fn(route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
