// ABOUTME: Core types and access policy for the Tasty Treats recipe platform
// ABOUTME: Foundation crate with error handling, domain models, permissions, and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

#![deny(unsafe_code)]

//! # Tasty Core
//!
//! Foundation crate providing shared types for the Tasty Treats recipe
//! platform. Everything here is free of I/O: the server crate owns the
//! database, HTTP and authentication layers and calls into this crate for
//! the rules that decide who may see and change what.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: Field limits, fixed messages, and pagination defaults
//! - **models**: Principals, recipes, ingredients, social rows, and profiles
//! - **permissions**: Ownership guard, recipe visibility filter, relationship guard
//! - **pagination**: Page-number pagination envelopes

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Field limits, user-facing messages, and defaults
pub mod constants;

/// Core data models
pub mod models;

/// Access-control policy applied to every request
pub mod permissions;

/// Page-number pagination
pub mod pagination;
