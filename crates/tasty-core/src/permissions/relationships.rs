// ABOUTME: Uniqueness rules for follow and like relationships
// ABOUTME: Rejects self-follows and turns schema constraint failures into user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use crate::constants::messages;
#[cfg(feature = "database-errors")]
use crate::errors::DatabaseError;
use crate::errors::{AppError, AppResult};
use crate::models::UserId;

/// Relationship rows protected by a pair uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// (owner, followed)
    Follow,
    /// (owner, recipe)
    Like,
}

impl RelationshipKind {
    /// Message returned when the pair already exists
    #[must_use]
    pub const fn duplicate_message(self) -> &'static str {
        match self {
            Self::Follow => messages::ALREADY_FOLLOWING,
            Self::Like => messages::ALREADY_LIKED,
        }
    }

    /// Map a storage failure from inserting this relationship
    ///
    /// Unique violations become the duplicate message. A check violation
    /// can only come from the follower self-reference constraint.
    #[cfg(feature = "database-errors")]
    #[must_use]
    pub fn translate_insert_error(self, error: DatabaseError) -> AppError {
        match (self, error) {
            (_, DatabaseError::UniqueViolation(_)) => AppError::validation(self.duplicate_message()),
            (Self::Follow, DatabaseError::CheckViolation(_)) => {
                AppError::validation(messages::CANNOT_FOLLOW_SELF)
            }
            (_, other) => AppError::from(other),
        }
    }
}

/// Reject following yourself before touching storage
///
/// # Errors
///
/// Returns a validation error when both sides are the same user
pub fn validate_follow(owner_id: UserId, followed_id: UserId) -> AppResult<()> {
    if owner_id == followed_id {
        return Err(AppError::validation(messages::CANNOT_FOLLOW_SELF));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_self_follow_rejected() {
        let err = validate_follow(4, 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "You cannot follow yourself.");
        assert!(validate_follow(4, 5).is_ok());
    }

    #[test]
    fn test_duplicate_messages() {
        assert_eq!(
            RelationshipKind::Follow.duplicate_message(),
            "Already following this user."
        );
        assert_eq!(
            RelationshipKind::Like.duplicate_message(),
            "You have already liked this recipe."
        );
    }

    #[cfg(feature = "database-errors")]
    #[test]
    fn test_translate_unique_violation() {
        use crate::errors::DatabaseError;

        let err = RelationshipKind::Follow.translate_insert_error(DatabaseError::UniqueViolation(
            "UNIQUE constraint failed: followers.owner_id, followers.followed_id".to_owned(),
        ));
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Already following this user.");

        let err = RelationshipKind::Follow.translate_insert_error(DatabaseError::CheckViolation(
            "CHECK constraint failed".to_owned(),
        ));
        assert_eq!(err.message, "You cannot follow yourself.");

        let err = RelationshipKind::Like.translate_insert_error(DatabaseError::RowNotFound);
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }
}
