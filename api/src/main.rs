use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;
mod routes;
mod state;

use common::auth::{AuthService, JwtService};
use common::config::Settings;
use common::db::repositories::user::UserRepository;
use common::db::DbPool;
use common::retry::FixedDelay;
use state::AppState;

/// Attempts before the startup connectivity probe gives up
const CONNECT_MAX_ATTEMPTS: u32 = 5;
/// Fixed delay between startup probe attempts
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,common=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    tracing::info!("Starting API server");

    // Merge .env into the process environment before validation
    dotenvy::dotenv().ok();

    // Load configuration; the service cannot run misconfigured
    let config = match Settings::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration validation failed");
            std::process::exit(1);
        }
    };
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Configuration loaded"
    );

    // Initialize database connection pool. The pool is lazy: an
    // unreachable database must not prevent startup.
    let db_pool = DbPool::new(&config.database);

    // Probe connectivity in the background; serving does not wait for it
    // and /health reports the true state afterwards.
    let probe_pool = db_pool.clone();
    tokio::spawn(async move {
        let strategy = FixedDelay::new(CONNECT_RETRY_DELAY, CONNECT_MAX_ATTEMPTS);
        probe_pool.connect_with_retry(&strategy).await;
    });

    // Wire the credential verifier onto the shared pool
    let jwt_service = JwtService::new(&config.auth.jwt_secret);
    let user_repository = UserRepository::new(db_pool.clone());
    let auth_service = AuthService::new(jwt_service, user_repository);

    // Create application state and router
    let state = AppState::new(db_pool.clone(), auth_service, config.clone());
    let app = routes::create_router(state);

    // Start server
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    tracing::info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight requests have drained; the pool can close now
    db_pool.close().await;

    tracing::info!("API server stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Initiating graceful shutdown");
}
