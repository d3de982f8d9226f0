// ABOUTME: Logging configuration and structured logging setup for the recipe API
// ABOUTME: Picks an output format per environment and exposes typed event helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Structured logging built on `tracing-subscriber`.
//!
//! Production defaults to JSON lines with source locations; everything else
//! defaults to the human-readable format. `RUST_LOG` sets the base level;
//! the noisy dependencies are capped regardless.

use std::env;
use std::io;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::constants::service_names;

/// Directives applied on top of the configured level
const DEPENDENCY_DIRECTIVES: &[&str] = &[
    "hyper=warn",
    "h2=warn",
    "sqlx=warn",
    "sqlx::query=warn",
    "tower_http=info",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line, human-readable
    Pretty,
    /// Single line, no targets
    Compact,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level for this crate and `tasty_core`
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line
    pub include_location: bool,
    /// Service name attached to the startup event
    pub service_name: String,
    /// Deployment environment name
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
            include_location: false,
            service_name: service_names::TASTY_TREATS_SERVER.to_owned(),
            environment: "development".to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT`, `SERVICE_NAME`, and `LOG_INCLUDE_LOCATION`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);
        let production = environment.eq_ignore_ascii_case("production");

        let format = lookup("LOG_FORMAT")
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or(if production {
                LogFormat::Json
            } else {
                defaults.format
            });

        Self {
            level: lookup("RUST_LOG").unwrap_or(defaults.level),
            format,
            include_location: production || lookup("LOG_INCLUDE_LOCATION").is_some(),
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment,
        }
    }

    fn directives(&self) -> Vec<Directive> {
        let own = [
            format!("tasty_treats_server={}", self.level),
            format!("tasty_core={}", self.level),
        ];
        DEPENDENCY_DIRECTIVES
            .iter()
            .map(|d| (*d).to_owned())
            .chain(own)
            .filter_map(|d| d.parse().ok())
            .collect()
    }

    fn env_filter(&self) -> EnvFilter {
        let base = EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"));
        self.directives()
            .into_iter()
            .fold(base, EnvFilter::add_directive)
    }

    fn output_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let location = self.include_location;
        match self.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_file(location)
                .with_line_number(location)
                .with_writer(io::stdout)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_file(location)
                .with_line_number(location)
                .with_writer(io::stdout)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stdout)
                .boxed(),
        }
    }

    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(self.output_layer())
            .with(self.env_filter())
            .try_init()?;

        info!(
            service.name = %self.service_name,
            service.version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured events with stable field names
pub struct AppLogger;

impl AppLogger {
    /// Registration or login outcome
    pub fn log_auth_event(username: &str, event: &str, success: bool, details: Option<&str>) {
        if success {
            info!(user.name = %username, auth.event = %event, "Authentication succeeded");
        } else {
            warn!(
                user.name = %username,
                auth.event = %event,
                auth.details = details.unwrap_or(""),
                "Authentication failed"
            );
        }
    }

    /// One completed HTTP request
    pub fn log_api_request(
        method: &str,
        path: &str,
        status: u16,
        duration_ms: u64,
        user_id: Option<i64>,
    ) {
        if status >= 500 {
            warn!(
                http.method = %method,
                http.path = %path,
                http.status = status,
                http.duration_ms = duration_ms,
                user.id = ?user_id,
                "HTTP request failed"
            );
        } else {
            info!(
                http.method = %method,
                http.path = %path,
                http.status = status,
                http.duration_ms = duration_ms,
                user.id = ?user_id,
                "HTTP request"
            );
        }
    }

    /// Schema migration or other maintenance step
    pub fn log_database_operation(operation: &str, table: &str, success: bool, duration_ms: u64) {
        info!(
            db.operation = %operation,
            db.table = %table,
            db.success = success,
            db.duration_ms = duration_ms,
            "Database operation"
        );
    }

    /// Rejected credentials or tokens
    pub fn log_security_event(event_type: &str, details: &str, user_id: Option<i64>) {
        warn!(
            security.event = %event_type,
            security.details = %details,
            user.id = ?user_id,
            "Security event"
        );
    }

    /// A write refused because the caller does not own the object
    pub fn log_permission_denied(method: &str, path: &str, user_id: Option<i64>) {
        warn!(
            security.event = "permission_denied",
            http.method = %method,
            http.path = %path,
            user.id = ?user_id,
            "Non-owner write rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> LoggingConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        LoggingConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_development_defaults_to_pretty() {
        let config = config_from(&[]);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.include_location);
        assert_eq!(config.service_name, "tasty-treats-server");
    }

    #[test]
    fn test_production_defaults_to_json_with_location() {
        let config = config_from(&[("ENVIRONMENT", "production")]);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.include_location);
    }

    #[test]
    fn test_explicit_format_wins() {
        let config = config_from(&[("ENVIRONMENT", "production"), ("LOG_FORMAT", "Compact")]);
        assert_eq!(config.format, LogFormat::Compact);

        let unknown = config_from(&[("LOG_FORMAT", "xml")]);
        assert_eq!(unknown.format, LogFormat::Pretty);
    }

    #[test]
    fn test_directives_cover_dependencies_and_crates() {
        let config = config_from(&[("RUST_LOG", "debug")]);
        let rendered: Vec<String> = config.directives().iter().map(ToString::to_string).collect();
        assert!(rendered.contains(&"sqlx=warn".to_owned()));
        assert!(rendered.contains(&"tasty_treats_server=debug".to_owned()));
        assert_eq!(rendered.len(), DEPENDENCY_DIRECTIVES.len() + 2);
    }

    #[test]
    fn test_every_format_builds_a_layer() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            let config = LoggingConfig {
                format,
                ..LoggingConfig::default()
            };
            let subscriber = tracing_subscriber::registry().with(config.output_layer());
            tracing::subscriber::with_default(subscriber, || {
                info!(log.format = ?format, "layer built");
            });
        }
    }
}
