// ABOUTME: Domain models for users, recipes, ingredients, social rows, and profiles
// ABOUTME: Plain data types shared by the policy layer, storage layer, and HTTP handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

mod ingredient;
mod principal;
mod profile;
mod recipe;
mod social;

pub use ingredient::{
    validate_quantity, Ingredient, IngredientName, Measurement, MeasurementName, RecipeIngredient,
};
pub use principal::{AuthenticatedUser, Principal, User, UserId};
pub use profile::{Profile, ProfileCounts};
pub use recipe::{Recipe, RecipeStatus};
pub use social::{Comment, Follower, Like};
