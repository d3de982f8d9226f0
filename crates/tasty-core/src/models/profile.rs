// ABOUTME: User profile model with read-time relationship counts
// ABOUTME: One profile per user, created together with the account
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Public display metadata for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile id
    pub id: i64,
    /// Owning user
    pub owner_id: UserId,
    /// Display name
    pub name: String,
    /// About text
    pub content: String,
    /// Avatar path or URL
    pub image: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

/// Counts derived from other tables whenever a profile is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCounts {
    /// Recipes owned
    pub recipes_count: i64,
    /// Users following this profile's owner
    pub followers_count: i64,
    /// Users this profile's owner follows
    pub following_count: i64,
}
