// ABOUTME: Main library entry point for the Tasty Treats recipe sharing API
// ABOUTME: Exposes configuration, storage, authentication, and the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

#![deny(unsafe_code)]

//! # Tasty Treats Server
//!
//! A REST backend for sharing recipes. Users publish recipes with
//! ingredient lines, comment on and like each other's recipes, and follow
//! one another. Each user has a profile with counts derived at read time.
//!
//! ## Visibility
//!
//! Recipes are `published`, `draft`, or `hidden`. Published recipes are
//! visible to everyone; drafts and hidden recipes only to their owner.
//! Lists filter by visibility in SQL and detail routes answer 404 for a
//! recipe the caller may not see.
//!
//! ## Architecture
//!
//! - **`tasty-core`**: domain models, errors, access policy, and pagination
//! - **Database**: `SQLite` through `sqlx`, one manager per table
//! - **Auth**: bcrypt password hashes and HS256 bearer tokens
//! - **Routes**: one axum router per resource, merged in [`routes::build_router`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tasty_treats_server::config::ServerConfig;
//! use tasty_treats_server::database::Database;
//! use tasty_treats_server::resources::ServerResources;
//! use tasty_treats_server::server::TastyTreatsServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ServerConfig::from_env()?);
//!     let database =
//!         Database::new(&config.database.url, config.database.max_connections).await?;
//!     let resources = Arc::new(ServerResources::new(database, config));
//!     TastyTreatsServer::new(resources).run().await
//! }
//! ```

/// Password hashing and token issuing
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Service identity and defaults
pub mod constants;

/// `SQLite` storage and per-table managers
pub mod database;

/// Error types shared with `tasty-core`
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Authentication, CORS, and request tracing middleware
pub mod middleware;

/// Shared state handed to every handler
pub mod resources;

/// HTTP routes
pub mod routes;

/// Listener bootstrap and graceful shutdown
pub mod server;

pub use tasty_core::{models, pagination, permissions};
