// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Re-exports the typed ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

/// Environment variable parsing into `ServerConfig`
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig, PaginationConfig,
    ServerConfig,
};
