use std::sync::Arc;
use std::time::Instant;

use common::auth::AuthService;
use common::config::Settings;
use common::db::DbPool;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub auth_service: AuthService,
    pub config: Arc<Settings>,
    started_at: Instant,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(db_pool: DbPool, auth_service: AuthService, config: Settings) -> Self {
        Self {
            db_pool,
            auth_service,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the server process started
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
