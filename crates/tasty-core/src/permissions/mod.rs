// ABOUTME: Access-control policy: ownership guard, recipe visibility filter, relationship guard
// ABOUTME: Pure functions of principal, object, and intent; no storage or HTTP access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! # Permissions
//!
//! Every request passes through two independent checks:
//!
//! 1. [`visibility::RecipeVisibility`] narrows what recipes exist at all for
//!    the acting principal. Lists drop hidden rows; detail lookups of hidden
//!    rows become `NotFound`.
//! 2. [`ownership::check_object_permission`] runs on the fetched object for
//!    mutating requests and answers `PermissionDenied` for non-owners.
//!
//! Relationship creation additionally goes through [`relationships`], which
//! rejects self-follows and maps schema uniqueness failures onto the
//! user-facing duplicate messages.

/// Recipe-owner check for ingredient writes
pub mod ingredients;
/// Object-level ownership guard
pub mod ownership;
/// Follow and like uniqueness rules
pub mod relationships;
/// Query-time recipe visibility filter
pub mod visibility;

pub use ingredients::ensure_can_edit_ingredients;
pub use ownership::{check_object_permission, is_permitted, OwnedResource, Ownership, RequestIntent};
pub use relationships::{validate_follow, RelationshipKind};
pub use visibility::{RecipeVisibility, SqlFilter, SqlPart, SqlValue};
