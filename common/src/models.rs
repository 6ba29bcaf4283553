use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User represents a stored account record
///
/// The record's lifecycle belongs to the user-management side of the
/// system; this service only reads it during login.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserClaims represents JWT token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub id: i64,       // User ID
    pub email: String, // Login identifier
    pub exp: i64,      // Expiration time (Unix timestamp)
    pub iat: i64,      // Issued at (Unix timestamp)
}
