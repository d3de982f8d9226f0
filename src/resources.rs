// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Bundles the database, authentication, and configuration behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::sync::Arc;

use tasty_core::pagination::PageRequest;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::middleware::AuthMiddleware;

/// Everything a request handler needs, created once at startup
pub struct ServerResources {
    /// Storage
    pub database: Database,
    /// Token issuing and password hashing
    pub auth_manager: AuthManager,
    /// Principal resolution for incoming requests
    pub auth_middleware: AuthMiddleware,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let auth_manager = AuthManager::new(&config.auth);
        let auth_middleware = AuthMiddleware::new(auth_manager.clone(), database.clone());
        Self {
            database,
            auth_manager,
            auth_middleware,
            config,
        }
    }

    /// Build a page request from query parameters using the configured limits
    ///
    /// # Errors
    ///
    /// Returns an error if `page` or `page_size` is zero
    pub fn page_request(&self, page: Option<u32>, page_size: Option<u32>) -> AppResult<PageRequest> {
        PageRequest::from_query(
            page,
            page_size,
            self.config.pagination.default_page_size,
            self.config.pagination.max_page_size,
        )
    }
}
