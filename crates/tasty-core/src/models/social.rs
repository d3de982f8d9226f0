// ABOUTME: Social interaction models: comments, likes, and follower relationships
// ABOUTME: Each row has exactly one owner; likes and follows are unique per pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Comment left on a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: i64,
    /// Author
    pub owner_id: UserId,
    /// Recipe commented on
    pub recipe_id: i64,
    /// Body text
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// New unsaved comment stamped with the current time
    #[must_use]
    pub fn new(owner_id: UserId, recipe_id: i64, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            owner_id,
            recipe_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user liking a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    /// Like id
    pub id: i64,
    /// User who liked
    pub owner_id: UserId,
    /// Liked recipe
    pub recipe_id: i64,
    /// When
    pub created_at: DateTime<Utc>,
}

/// A user following another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follower {
    /// Row id
    pub id: i64,
    /// User doing the following
    pub owner_id: UserId,
    /// User being followed
    pub followed_id: UserId,
    /// When
    pub created_at: DateTime<Utc>,
}
