// ABOUTME: Recipe-owner check applied when ingredient lines are created or moved
// ABOUTME: Failing it is a validation error about the target recipe, not a permission error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::models::{Principal, UserId};

/// Ensure the principal owns the recipe an ingredient line targets
///
/// # Errors
///
/// Returns a validation error when the principal is not the recipe owner
pub fn ensure_can_edit_ingredients(principal: &Principal, recipe_owner_id: UserId) -> AppResult<()> {
    if principal.is_owner(recipe_owner_id) {
        Ok(())
    } else {
        Err(AppError::validation(messages::NOT_RECIPE_OWNER))
    }
}
