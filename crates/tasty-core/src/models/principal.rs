// ABOUTME: Principal and user account models
// ABOUTME: A request acts either as an anonymous visitor or as one authenticated user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Database identifier of a user account
pub type UserId = i64;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User id
    pub id: UserId,
    /// Unique username
    pub username: String,
}

/// Who is acting on a request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    /// No credentials were presented
    #[default]
    Anonymous,
    /// A verified user
    User(AuthenticatedUser),
}

impl Principal {
    /// Build an authenticated principal
    pub fn user(id: UserId, username: impl Into<String>) -> Self {
        Self::User(AuthenticatedUser {
            id,
            username: username.into(),
        })
    }

    /// User id, if authenticated
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user.id),
        }
    }

    /// Anonymous principals never own anything
    #[must_use]
    pub fn is_owner(&self, owner_id: UserId) -> bool {
        self.user_id() == Some(owner_id)
    }

    /// The authenticated user, or `AuthRequired`
    ///
    /// # Errors
    ///
    /// Returns an error if the principal is anonymous
    pub fn require_user(&self) -> AppResult<&AuthenticatedUser> {
        match self {
            Self::Anonymous => Err(AppError::auth_required()),
            Self::User(user) => Ok(user),
        }
    }
}

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: UserId,
    /// Unique username
    pub username: String,
    /// Optional contact address
    pub email: Option<String>,
    /// bcrypt hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Principal for this account
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::user(self.id, self.username.clone())
    }
}
