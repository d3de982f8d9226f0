// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, server resources, and user creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `tasty_treats_server`

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use tasty_treats_server::config::ServerConfig;
use tasty_treats_server::database::Database;
use tasty_treats_server::models::User;
use tasty_treats_server::resources::ServerResources;
use tasty_treats_server::routes::build_router;

static INIT_LOGGER: Once = Once::new();

/// Password given to every user created by [`create_test_user`]
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let config = ServerConfig::for_testing();
    Database::new(&config.database.url, config.database.max_connections).await
}

/// Server resources over a fresh in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        database,
        Arc::new(ServerConfig::for_testing()),
    )))
}

/// Resources plus the complete router with middleware
pub async fn create_test_app() -> Result<(Arc<ServerResources>, Router)> {
    let resources = create_test_server_resources().await?;
    let router = build_router(Arc::clone(&resources));
    Ok((resources, router))
}

/// Create a user with [`TEST_PASSWORD`] and return it with an `Authorization` header value
pub async fn create_test_user(
    resources: &ServerResources,
    username: &str,
) -> Result<(User, String)> {
    let hash = resources.auth_manager.hash_password(TEST_PASSWORD).await?;
    let email = format!("{username}@example.com");
    let user = resources
        .database
        .users()
        .create_user(username, Some(email.as_str()), &hash)
        .await?;
    let token = resources.auth_manager.generate_token(&user)?;
    Ok((user, format!("Bearer {}", token.token)))
}
