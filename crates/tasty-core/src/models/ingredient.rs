// ABOUTME: Ingredient, measurement, and recipe-ingredient models
// ABOUTME: Names are shared across recipes and matched exactly, including case and whitespace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};

/// Validated ingredient name. Stored and compared byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IngredientName(String);

impl IngredientName {
    /// Validate a free-text ingredient name
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or overlong names
    pub fn parse(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        validate_name("ingredient", &raw, limits::INGREDIENT_NAME_MAX_LEN)?;
        Ok(Self(raw))
    }

    /// Name as stored
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IngredientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated measurement name such as `g` or `tbsp`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MeasurementName(String);

impl MeasurementName {
    /// Validate a free-text measurement name
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or overlong names
    pub fn parse(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        validate_name("measure", &raw, limits::MEASUREMENT_NAME_MAX_LEN)?;
        Ok(Self(raw))
    }

    /// Name as stored
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeasurementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_name(field: &str, raw: &str, max_len: usize) -> AppResult<()> {
    if raw.trim().is_empty() {
        return Err(AppError::validation(format!(
            "{field}: This field may not be blank."
        )));
    }
    if raw.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field}: Ensure this field has no more than {max_len} characters."
        )));
    }
    Ok(())
}

/// Validate a quantity string such as `2` or `1/2`
///
/// # Errors
///
/// Returns a validation error for blank or overlong quantities
pub fn validate_quantity(raw: &str) -> AppResult<()> {
    validate_name("quantity", raw, limits::QUANTITY_MAX_LEN)
}

/// Shared ingredient row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient id
    pub id: i64,
    /// Unique name
    pub name: String,
}

/// Shared measurement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measurement id
    pub id: i64,
    /// Unique name
    pub measure: String,
}

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Row id
    pub id: i64,
    /// Recipe this line belongs to
    pub recipe_id: i64,
    /// Owner of that recipe, which is also the owner of this line
    pub recipe_owner_id: UserId,
    /// Ingredient name
    pub ingredient: String,
    /// Quantity as entered
    pub quantity: String,
    /// Measurement name
    pub measure: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_keep_case_and_whitespace() {
        let salt = IngredientName::parse("Salt").unwrap();
        let lower = IngredientName::parse("salt").unwrap();
        let padded = IngredientName::parse("Salt ").unwrap();
        assert_ne!(salt, lower);
        assert_ne!(salt, padded);
        assert_eq!(padded.as_str(), "Salt ");
    }

    #[test]
    fn test_name_limits() {
        assert!(IngredientName::parse("").is_err());
        assert!(IngredientName::parse(" ").is_err());
        assert!(IngredientName::parse("a".repeat(255)).is_ok());
        assert!(IngredientName::parse("a".repeat(256)).is_err());
        assert!(MeasurementName::parse("a".repeat(50)).is_ok());
        assert!(MeasurementName::parse("a".repeat(51)).is_err());
        assert!(validate_quantity("1/2").is_ok());
        assert!(validate_quantity(&"1".repeat(51)).is_err());
    }
}
