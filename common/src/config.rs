// Configuration management sourced from the process environment

use config::{Config, Environment};
use serde::Deserialize;

use crate::errors::ConfigError;

/// Connection ceiling for the database pool
pub const POOL_MAX_CONNECTIONS: u32 = 10;
/// Seconds a caller may wait for a pooled connection
pub const POOL_CONNECT_TIMEOUT_SECONDS: u64 = 10;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Raw environment snapshot prior to validation
///
/// Field names map 1:1 to the environment variables (the `config` crate
/// lowercases keys), so `DB_HOST` lands in `db_host`. Every field defaults
/// to empty so validation can name each missing variable instead of
/// failing on the first deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEnv {
    pub db_host: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    pub db_port: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: String,
    pub allowed_origins: String,
}

impl RawEnv {
    /// Names of required variables that are missing or empty
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.db_host.is_empty() {
            missing.push("DB_HOST");
        }
        if self.db_user.is_empty() {
            missing.push("DB_USER");
        }
        if self.db_pass.is_empty() {
            missing.push("DB_PASS");
        }
        if self.db_name.is_empty() {
            missing.push("DB_NAME");
        }
        if self.db_port.is_empty() {
            missing.push("DB_PORT");
        }
        if self.jwt_secret.is_empty() {
            missing.push("JWT_SECRET");
        }
        missing
    }
}

/// Main settings structure containing all configuration options
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API; empty means permissive
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load and validate configuration from the environment
    ///
    /// The process cannot serve traffic misconfigured: every missing
    /// required variable is logged by name before the error is returned,
    /// and the caller is expected to exit.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawEnv = Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    /// Validate a raw environment snapshot into usable settings
    pub fn from_raw(raw: RawEnv) -> Result<Self, ConfigError> {
        let missing = raw.missing_keys();
        if !missing.is_empty() {
            for key in &missing {
                tracing::error!(key = %key, "Environment variable is missing or undefined");
            }
            return Err(ConfigError::MissingVars(missing.join(", ")));
        }

        let db_port = raw
            .db_port
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "DB_PORT".to_string(),
                reason: e.to_string(),
            })?;

        let server_host = if raw.host.is_empty() {
            DEFAULT_SERVER_HOST.to_string()
        } else {
            raw.host
        };

        let server_port = if raw.port.is_empty() {
            DEFAULT_SERVER_PORT
        } else {
            raw.port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                reason: e.to_string(),
            })?
        };

        let allowed_origins = raw
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            server: ServerConfig {
                host: server_host,
                port: server_port,
            },
            database: DatabaseConfig {
                host: raw.db_host,
                user: raw.db_user,
                password: raw.db_pass,
                name: raw.db_name,
                port: db_port,
                max_connections: POOL_MAX_CONNECTIONS,
                connect_timeout_seconds: POOL_CONNECT_TIMEOUT_SECONDS,
            },
            auth: AuthConfig {
                jwt_secret: raw.jwt_secret,
            },
            cors: CorsConfig { allowed_origins },
        })
    }
}
