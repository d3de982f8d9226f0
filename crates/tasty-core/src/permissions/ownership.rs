// ABOUTME: Object-level ownership guard deciding whether a principal may mutate an object
// ABOUTME: Reads always pass; writes pass only for the declared owner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use crate::errors::{AppError, AppResult};
use crate::models::{Comment, Follower, Like, Principal, Profile, Recipe, RecipeIngredient, UserId};

/// What the request wants to do with the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestIntent {
    /// GET, HEAD, OPTIONS
    Read,
    /// Any other method
    Write,
}

impl RequestIntent {
    /// Classify an HTTP method name
    #[must_use]
    pub fn from_method(method: &str) -> Self {
        if ["GET", "HEAD", "OPTIONS"]
            .iter()
            .any(|safe| safe.eq_ignore_ascii_case(method))
        {
            Self::Read
        } else {
            Self::Write
        }
    }
}

/// How an object names its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The object has an owner column of its own
    Direct {
        /// Owning user
        owner_id: UserId,
    },
    /// The object is owned by whoever owns the parent recipe
    ViaRecipe {
        /// Parent recipe
        recipe_id: i64,
        /// Owner of the parent recipe
        recipe_owner_id: UserId,
    },
}

impl Ownership {
    /// The user who may mutate the object
    #[must_use]
    pub const fn owner_id(self) -> UserId {
        match self {
            Self::Direct { owner_id } => owner_id,
            Self::ViaRecipe {
                recipe_owner_id, ..
            } => recipe_owner_id,
        }
    }
}

/// Implemented by every object the guard protects
pub trait OwnedResource {
    /// Declared ownership of this object
    fn ownership(&self) -> Ownership;
}

impl OwnedResource for Recipe {
    fn ownership(&self) -> Ownership {
        Ownership::Direct {
            owner_id: self.owner_id,
        }
    }
}

impl OwnedResource for Comment {
    fn ownership(&self) -> Ownership {
        Ownership::Direct {
            owner_id: self.owner_id,
        }
    }
}

impl OwnedResource for Like {
    fn ownership(&self) -> Ownership {
        Ownership::Direct {
            owner_id: self.owner_id,
        }
    }
}

impl OwnedResource for Follower {
    fn ownership(&self) -> Ownership {
        Ownership::Direct {
            owner_id: self.owner_id,
        }
    }
}

impl OwnedResource for Profile {
    fn ownership(&self) -> Ownership {
        Ownership::Direct {
            owner_id: self.owner_id,
        }
    }
}

impl OwnedResource for RecipeIngredient {
    fn ownership(&self) -> Ownership {
        Ownership::ViaRecipe {
            recipe_id: self.recipe_id,
            recipe_owner_id: self.recipe_owner_id,
        }
    }
}

/// Whether the principal may act on the object with the given intent
#[must_use]
pub fn is_permitted<R: OwnedResource + ?Sized>(
    principal: &Principal,
    resource: &R,
    intent: RequestIntent,
) -> bool {
    match intent {
        RequestIntent::Read => true,
        RequestIntent::Write => principal.is_owner(resource.ownership().owner_id()),
    }
}

/// Guard variant of [`is_permitted`]
///
/// # Errors
///
/// Returns `PermissionDenied` when a write is attempted by anyone but the owner
pub fn check_object_permission<R: OwnedResource + ?Sized>(
    principal: &Principal,
    resource: &R,
    intent: RequestIntent,
) -> AppResult<()> {
    if is_permitted(principal, resource, intent) {
        return Ok(());
    }
    tracing::warn!(
        user_id = ?principal.user_id(),
        owner_id = resource.ownership().owner_id(),
        "Ownership check denied write"
    );
    Err(AppError::forbidden())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::errors::ErrorCode;

    fn comment(owner_id: UserId) -> Comment {
        let now = Utc::now();
        Comment {
            id: 1,
            owner_id,
            recipe_id: 10,
            content: "Lovely".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    fn line(recipe_owner_id: UserId) -> RecipeIngredient {
        RecipeIngredient {
            id: 3,
            recipe_id: 10,
            recipe_owner_id,
            ingredient: "Salt".to_owned(),
            quantity: "1".to_owned(),
            measure: "tsp".to_owned(),
        }
    }

    #[test]
    fn test_reads_always_pass() {
        let item = comment(1);
        assert!(is_permitted(&Principal::Anonymous, &item, RequestIntent::Read));
        assert!(is_permitted(&Principal::user(2, "bob"), &item, RequestIntent::Read));
    }

    #[test]
    fn test_writes_require_owner() {
        let item = comment(1);
        assert!(is_permitted(&Principal::user(1, "kalle"), &item, RequestIntent::Write));
        assert!(!is_permitted(&Principal::user(2, "bob"), &item, RequestIntent::Write));
        assert!(!is_permitted(&Principal::Anonymous, &item, RequestIntent::Write));
    }

    #[test]
    fn test_recipe_ingredient_owned_through_recipe() {
        let item = line(7);
        assert_eq!(item.ownership().owner_id(), 7);
        assert!(is_permitted(&Principal::user(7, "kalle"), &item, RequestIntent::Write));
        assert!(!is_permitted(&Principal::user(8, "bob"), &item, RequestIntent::Write));
    }

    #[test]
    fn test_denial_is_forbidden_not_validation() {
        let err = check_object_permission(&Principal::user(2, "bob"), &comment(1), RequestIntent::Write)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.http_status(), 403);
    }

    #[test]
    fn test_intent_from_method() {
        assert_eq!(RequestIntent::from_method("GET"), RequestIntent::Read);
        assert_eq!(RequestIntent::from_method("head"), RequestIntent::Read);
        assert_eq!(RequestIntent::from_method("OPTIONS"), RequestIntent::Read);
        assert_eq!(RequestIntent::from_method("PATCH"), RequestIntent::Write);
        assert_eq!(RequestIntent::from_method("DELETE"), RequestIntent::Write);
    }
}
