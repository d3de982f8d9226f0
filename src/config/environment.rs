// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig with sane defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Environment-based configuration

use std::env;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::generate_jwt_secret;
use crate::constants::{defaults, pagination};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests and demos)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL or a bare file path
    ///
    /// # Errors
    ///
    /// Returns an error for non-SQLite URLs
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                return Ok(Self::Memory);
            }
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            return Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            });
        }
        if s.contains("://") {
            return Err(anyhow!("Unsupported database URL scheme: {s}"));
        }
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from(defaults::DATABASE_URL.trim_start_matches("sqlite:")),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// HTTP hardening settings
    pub http: HttpConfig,
    /// Pagination limits
    pub pagination: PaginationConfig,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Location
    pub url: DatabaseUrl,
    /// Pool size for file databases; in-memory databases always use one connection
    pub max_connections: u32,
}

/// Authentication settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// bcrypt cost factor
    pub password_hash_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

/// HTTP hardening settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Maximum request body size
    pub max_request_body_bytes: usize,
}

/// Pagination limits
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    /// Page size when the client does not choose one
    pub default_page_size: u32,
    /// Largest page size a client may request
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: pagination::DEFAULT_PAGE_SIZE,
            max_page_size: pagination::MAX_PAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but malformed, or when
    /// production is configured without a `JWT_SECRET`
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            host: env_var_or("HOST", defaults::HOST),
            http_port: parse_env("HTTP_PORT", defaults::HTTP_PORT)?,
            environment,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL))?,
                max_connections: parse_env(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults::DATABASE_MAX_CONNECTIONS,
                )?,
            },
            auth: AuthConfig {
                jwt_secret: load_jwt_secret(environment)?,
                jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", defaults::JWT_EXPIRY_HOURS)?,
                password_hash_cost: parse_env("PASSWORD_HASH_COST", defaults::PASSWORD_HASH_COST)?,
            },
            http: HttpConfig {
                cors_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
                max_request_body_bytes: parse_env(
                    "MAX_REQUEST_BODY_BYTES",
                    defaults::MAX_REQUEST_BODY_BYTES,
                )?,
            },
            pagination: PaginationConfig {
                default_page_size: parse_env("DEFAULT_PAGE_SIZE", pagination::DEFAULT_PAGE_SIZE)?,
                max_page_size: parse_env("MAX_PAGE_SIZE", pagination::MAX_PAGE_SIZE)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration for tests: in-memory database, fixed secret, cheap hashing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: 0,
            environment: Environment::Testing,
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: b"test-secret-for-tasty-treats-integration-tests".to_vec(),
                jwt_expiry_hours: defaults::JWT_EXPIRY_HOURS,
                password_hash_cost: bcrypt::DEFAULT_COST.min(4),
            },
            http: HttpConfig {
                cors_origins: vec!["*".to_owned()],
                max_request_body_bytes: defaults::MAX_REQUEST_BODY_BYTES,
            },
            pagination: PaginationConfig::default(),
        }
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_expiry_hours <= 0 {
            return Err(anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }
        if !(4..=31).contains(&self.auth.password_hash_cost) {
            return Err(anyhow!("PASSWORD_HASH_COST must be between 4 and 31"));
        }
        if self.pagination.default_page_size == 0 || self.pagination.max_page_size == 0 {
            return Err(anyhow!("Page sizes must be positive"));
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(anyhow!("DEFAULT_PAGE_SIZE cannot exceed MAX_PAGE_SIZE"));
        }
        if self.environment.is_production() && self.database.url.is_memory() {
            warn!("Production is running on an in-memory database; data will not persist");
        }
        Ok(())
    }

    /// Summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Tasty Treats API Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Database: {}\n\
             - JWT expiry: {}h\n\
             - CORS origins: {}\n\
             - Page size: {} (max {})",
            self.environment,
            self.host,
            self.http_port,
            self.database.url,
            self.auth.jwt_expiry_hours,
            self.http.cors_origins.join(","),
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}")),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

fn load_jwt_secret(environment: Environment) -> Result<Vec<u8>> {
    if let Ok(secret) = env::var("JWT_SECRET") {
        if secret.len() < 32 {
            warn!("JWT_SECRET is shorter than 32 bytes");
        }
        return Ok(secret.into_bytes());
    }
    if environment.is_production() {
        return Err(anyhow!("JWT_SECRET must be set in production"));
    }
    warn!("JWT_SECRET not set; generating a per-process secret. Tokens will not survive restarts");
    Ok(generate_jwt_secret().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_database_url() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:").unwrap(), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/app.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/app.db")
            }
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test".to_owned(), "http://b.test".to_owned()]
        );
    }

    #[test]
    fn test_testing_config_is_valid() {
        assert!(ServerConfig::for_testing().validate().is_ok());
    }
}
