// ABOUTME: Recipe model and its publication status lifecycle
// ABOUTME: Status decides who may see a recipe; only published recipes are public
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;
use crate::constants::{images, limits};
use crate::errors::{AppError, AppResult};

/// Publication status of a recipe
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    /// Draft, visible to the owner only
    #[default]
    PendingPublish,
    /// Public
    Published,
    /// Marked for removal, visible to the owner only
    PendingDelete,
}

impl RecipeStatus {
    /// Every status, in declaration order
    pub const ALL: [Self; 3] = [Self::PendingPublish, Self::Published, Self::PendingDelete];

    /// Storage and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingPublish => "pending_publish",
            Self::Published => "published",
            Self::PendingDelete => "pending_delete",
        }
    }

    /// Whether anyone may see a recipe in this status
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Published)
    }

    /// Parse a comma separated list such as `pending_publish,published`
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first unknown choice
    pub fn parse_list(raw: &str) -> AppResult<Vec<Self>> {
        let mut statuses = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let status = part.parse::<Self>()?;
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        Ok(statuses)
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_publish" => Ok(Self::PendingPublish),
            "published" => Ok(Self::Published),
            "pending_delete" => Ok(Self::PendingDelete),
            other => Err(AppError::validation(format!(
                "Select a valid choice. {other} is not one of the available choices."
            ))),
        }
    }
}

/// A recipe owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe id
    pub id: i64,
    /// Owning user
    pub owner_id: UserId,
    /// Title
    pub recipe_name: String,
    /// Short introduction
    pub intro: String,
    /// Preparation steps
    pub instruction: String,
    /// Image path or URL
    pub image: String,
    /// Publication status
    pub status: RecipeStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new draft recipe
    #[must_use]
    pub fn new(owner_id: UserId, recipe_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            owner_id,
            recipe_name,
            intro: String::new(),
            instruction: String::new(),
            image: images::DEFAULT_RECIPE_IMAGE.to_owned(),
            status: RecipeStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check a recipe name before it is stored
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or overlong names
    pub fn validate_name(name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("recipe_name: This field may not be blank."));
        }
        if name.chars().count() > limits::RECIPE_NAME_MAX_LEN {
            return Err(AppError::validation(format!(
                "recipe_name: Ensure this field has no more than {} characters.",
                limits::RECIPE_NAME_MAX_LEN
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_pending_publish() {
        assert_eq!(RecipeStatus::default(), RecipeStatus::PendingPublish);
        assert_eq!(
            Recipe::new(1, "Pancakes".to_owned()).status,
            RecipeStatus::PendingPublish
        );
    }

    #[test]
    fn test_parse_list() {
        let statuses = RecipeStatus::parse_list("pending_publish, published,published").unwrap();
        assert_eq!(
            statuses,
            vec![RecipeStatus::PendingPublish, RecipeStatus::Published]
        );
    }

    #[test]
    fn test_parse_list_rejects_unknown_choice() {
        let err = RecipeStatus::parse_list("published,archived").unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(err.message.contains("archived"));
    }

    #[test]
    fn test_validate_name_limits() {
        assert!(Recipe::validate_name("Kanelbullar").is_ok());
        assert!(Recipe::validate_name("   ").is_err());
        assert!(Recipe::validate_name(&"x".repeat(256)).is_err());
    }
}
