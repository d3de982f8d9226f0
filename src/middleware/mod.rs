// ABOUTME: HTTP middleware for request tracing, authentication, and CORS
// ABOUTME: Provides request ID generation, span creation, and principal resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

pub mod auth;
pub mod cors;
pub mod tracing;

// Authentication middleware
pub use auth::{authenticate, AuthMiddleware};

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{log_requests, make_request_span, MakePrefixedRequestId};
