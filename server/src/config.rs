//! Configuration management for the server.

use std::env;

/// Secret used to sign tokens when `JWT_SECRET` is not set.
pub const DEV_JWT_SECRET: &str = "emporium-development-secret";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// HMAC secret for signing access tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub jwt_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
        if jwt_secret.is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }

        let jwt_ttl_secs = match env::var("JWT_TTL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::InvalidJwtTtl)?,
            Err(_) => 3600,
        };

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_ttl_secs,
        })
    }

    /// Whether tokens are signed with the built-in development secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_secs: 600,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("JWT_SECRET must not be empty")]
    EmptyJwtSecret,

    #[error("JWT_TTL_SECS must be a positive integer")]
    InvalidJwtTtl,
}
