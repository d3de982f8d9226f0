// ABOUTME: Server-side constants for service identity, environment defaults, and routes
// ABOUTME: Domain limits and messages live in tasty-core and are re-exported here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

pub use tasty_core::constants::{images, limits, messages, pagination};

/// Service names used in logs
pub mod service_names {
    /// Main HTTP server
    pub const TASTY_TREATS_SERVER: &str = "tasty-treats-server";
}

/// Defaults applied when an environment variable is absent
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "127.0.0.1";
    /// HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Database location
    pub const DATABASE_URL: &str = "sqlite:./data/tasty_treats.db";
    /// Token lifetime
    pub const JWT_EXPIRY_HOURS: i64 = 24;
    /// bcrypt cost factor
    pub const PASSWORD_HASH_COST: u32 = 12;
    /// Maximum accepted request body
    pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;
    /// Pool size for file databases
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    /// JWT audience claim
    pub const JWT_AUDIENCE: &str = "tasty-treats-api";
}

/// Request header names
pub mod headers {
    /// Correlation id header
    pub const REQUEST_ID: &str = "x-request-id";
}
