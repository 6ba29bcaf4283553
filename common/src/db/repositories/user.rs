// User repository implementation

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::User;
use tracing::instrument;

/// Repository for user-related database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find a user by email for login
    ///
    /// Connection acquisition and release are handled by the pool; errors
    /// are logged here and propagated to the caller unchanged.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Database query error");
            DatabaseError::from(e)
        })?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    #[tokio::test]
    async fn test_find_by_email_propagates_pool_errors() {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            user: "app".to_string(),
            password: "secret".to_string(),
            name: "appdb".to_string(),
            port: 1,
            max_connections: 1,
            connect_timeout_seconds: 1,
        };
        let repository = UserRepository::new(DbPool::new(&config));

        let result = repository.find_by_email("a@x.com").await;
        assert!(result.is_err());
    }
}
