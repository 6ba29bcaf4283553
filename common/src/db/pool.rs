// MySQL connection pool implementation

use crate::config::DatabaseConfig;
use crate::errors::DatabaseError;
use crate::retry::RetryStrategy;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Database connection pool wrapper
///
/// Owns a bounded set of reusable connections. Each connection is held
/// exclusively by one in-flight query and returned afterwards; demand
/// beyond the ceiling waits in the pool's internal queue.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: MySqlPool,
}

impl DbPool {
    /// Create a new database connection pool
    ///
    /// The pool is lazy: connections are opened on first acquire, so an
    /// unreachable database does not prevent the process from starting.
    /// Startup connectivity is probed separately by `connect_with_retry`.
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub fn new(config: &DatabaseConfig) -> Self {
        info!("Initializing database connection pool");

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .port(config.port);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_lazy_with(options);

        info!(
            max_connections = config.max_connections,
            connect_timeout_seconds = config.connect_timeout_seconds,
            "Database connection pool initialized"
        );

        Self { pool }
    }

    /// Probe database connectivity, retrying per the given strategy
    ///
    /// Each attempt acquires one connection and immediately releases it.
    /// Failures are logged with the attempt number and cause; once the
    /// strategy is exhausted a terminal warning is logged and the service
    /// keeps running. `/health` reports the true state afterwards.
    ///
    /// Returns whether a connection was established.
    #[instrument(skip(self, strategy))]
    pub async fn connect_with_retry(&self, strategy: &dyn RetryStrategy) -> bool {
        let mut attempt = 0u32;
        loop {
            match self.pool.acquire().await {
                Ok(conn) => {
                    info!("Connected to MySQL database successfully");
                    drop(conn);
                    return true;
                }
                Err(e) => {
                    attempt += 1;
                    tracing::error!(attempt, error = %e, "Failed to connect to MySQL");

                    match strategy.next_delay(attempt) {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => {
                            warn!("Max connection attempts reached. Database unavailable.");
                            return false;
                        }
                    }
                }
            }
        }
    }

    /// Perform a health check on the database connection
    ///
    /// # Returns
    /// `Ok(())` if the database is healthy, `Err` otherwise
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::HealthCheckFailed(e.to_string())
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Get a reference to the underlying pool
    ///
    /// This is used by repositories to execute queries
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Get the current number of connections in the pool
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Get the number of idle connections in the pool
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close the connection pool gracefully
    ///
    /// Must run only after in-flight requests have drained, to avoid
    /// aborting live queries.
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::FixedDelay;

    fn unreachable_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "127.0.0.1".to_string(),
            user: "app".to_string(),
            password: "secret".to_string(),
            name: "appdb".to_string(),
            // Port 1 is never a MySQL listener; acquire fails fast
            port: 1,
            max_connections: 2,
            connect_timeout_seconds: 1,
        }
    }

    #[tokio::test]
    async fn test_lazy_pool_creation_succeeds_without_database() {
        let pool = DbPool::new(&unreachable_config());
        assert_eq!(pool.size(), 0);
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up_after_max_attempts() {
        let pool = DbPool::new(&unreachable_config());
        let strategy = FixedDelay::new(Duration::from_millis(1), 2);

        let connected = pool.connect_with_retry(&strategy).await;
        assert!(!connected);
    }

    #[tokio::test]
    async fn test_health_check_fails_without_database() {
        let pool = DbPool::new(&unreachable_config());
        let result = pool.health_check().await;
        assert!(matches!(result, Err(DatabaseError::HealthCheckFailed(_))));
    }

    #[tokio::test]
    #[ignore] // Requires running MySQL instance
    async fn test_concurrent_queries_beyond_ceiling_all_complete() {
        let config = DatabaseConfig {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: "root".to_string(),
            name: "test_db".to_string(),
            port: 3306,
            max_connections: 2,
            connect_timeout_seconds: 5,
        };
        let pool = DbPool::new(&config);

        // More requests than connections; excess demand waits in the
        // pool's queue and every request still completes
        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move { pool.health_check().await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.expect("task panicked").is_ok());
        }
    }

    #[tokio::test]
    #[ignore] // Requires running MySQL instance
    async fn test_health_check_against_live_database() {
        let config = DatabaseConfig {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: "root".to_string(),
            name: "test_db".to_string(),
            port: 3306,
            max_connections: 5,
            connect_timeout_seconds: 5,
        };

        let pool = DbPool::new(&config);
        assert!(pool.health_check().await.is_ok());
    }
}
