// ABOUTME: Server-side re-exports of the shared error types
// ABOUTME: Lets server modules write crate::errors::AppError like the rest of the codebase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! # Error Handling
//!
//! The error types live in `tasty_core::errors` so the policy layer and the
//! server share one `AppError`. This module only re-exports them.

pub use tasty_core::errors::{
    AppError, AppResult, DatabaseError, DatabaseResult, ErrorCode, ErrorResponse,
};
