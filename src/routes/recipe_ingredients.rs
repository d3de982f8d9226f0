// ABOUTME: Recipe ingredient line endpoints and the shared ingredient and measurement catalog
// ABOUTME: Lines follow their recipe's visibility; only the recipe owner may write them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Recipe ingredient routes
//!
//! Ingredient and measurement names are resolved get-or-create on every
//! write, so two recipes naming `Salt` share one ingredient row.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tasty_core::models::{
    validate_quantity, IngredientName, MeasurementName, Principal, RecipeIngredient,
};
use tasty_core::pagination::Page;
use tasty_core::permissions::{
    check_object_permission, ensure_can_edit_ingredients, RecipeVisibility, RequestIntent,
};

use super::{created, no_content, ok};
use crate::database::RecipeIngredientFilter;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Ingredient line as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientResponse {
    /// Line id
    pub id: i64,
    /// Recipe id
    pub recipe: i64,
    /// Whether the caller owns the recipe
    pub is_owner: bool,
    /// Ingredient name
    pub ingredient: String,
    /// Quantity as entered
    pub quantity: String,
    /// Measurement name
    pub measure: String,
}

impl RecipeIngredientResponse {
    /// Render a line for `principal`
    #[must_use]
    pub fn from_line(line: RecipeIngredient, principal: &Principal) -> Self {
        Self {
            id: line.id,
            recipe: line.recipe_id,
            is_owner: principal.is_owner(line.recipe_owner_id),
            ingredient: line.ingredient,
            quantity: line.quantity,
            measure: line.measure,
        }
    }
}

/// Query parameters for the line list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeIngredientListQuery {
    /// Recipe id
    pub recipe: Option<i64>,
    /// Case-insensitive substring of the recipe name
    pub recipe_name: Option<String>,
    /// Exact ingredient name
    pub ingredient: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
}

/// Body for creating or fully replacing a line
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeIngredientRequest {
    /// Recipe id
    pub recipe: i64,
    /// Ingredient name
    pub ingredient: String,
    /// Quantity
    pub quantity: String,
    /// Measurement name
    pub measure: String,
}

/// Body for a partial line update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeIngredientPatch {
    /// Recipe id
    pub recipe: Option<i64>,
    /// Ingredient name
    pub ingredient: Option<String>,
    /// Quantity
    pub quantity: Option<String>,
    /// Measurement name
    pub measure: Option<String>,
}

/// Catalog entry for ingredient and measurement names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Row id
    pub id: i64,
    /// Name
    pub name: String,
}

/// Recipe ingredient routes handler
pub struct RecipeIngredientRoutes;

impl RecipeIngredientRoutes {
    /// Create all recipe ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/recipe-ingredients",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/recipe-ingredients/:id",
                get(Self::handle_get)
                    .put(Self::handle_replace)
                    .patch(Self::handle_patch)
                    .delete(Self::handle_delete),
            )
            .route("/ingredients", get(Self::handle_list_ingredients))
            .route("/measurements", get(Self::handle_list_measurements))
            .with_state(resources)
    }

    /// Handle GET /recipe-ingredients
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Query(query): Query<RecipeIngredientListQuery>,
    ) -> Result<Response, AppError> {
        let page_request = resources.page_request(query.page, query.page_size)?;
        let filter = RecipeIngredientFilter {
            recipe: query.recipe,
            recipe_name: query.recipe_name,
            ingredient: query.ingredient,
        };
        let visibility = RecipeVisibility::for_principal(&principal);

        let (lines, count) = resources
            .database
            .recipe_ingredients()
            .list_recipe_ingredients(&filter, &visibility, page_request)
            .await?;

        let page = Page::new(lines, count, page_request)?
            .map(|line| RecipeIngredientResponse::from_line(line, &principal));
        Ok(ok(page))
    }

    /// Handle POST /recipe-ingredients
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Json(body): Json<RecipeIngredientRequest>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let ingredient = IngredientName::parse(body.ingredient)?;
        let measure = MeasurementName::parse(body.measure)?;
        validate_quantity(&body.quantity)?;

        Self::ensure_recipe_editable(&resources, &principal, body.recipe).await?;

        let manager = resources.database.recipe_ingredients();
        let id = manager
            .create_recipe_ingredient(body.recipe, &ingredient, &body.quantity, &measure)
            .await?;
        let (line, _) = manager
            .get_recipe_ingredient(id)
            .await?
            .ok_or_else(|| AppError::internal("Created recipe ingredient vanished"))?;

        Ok(created(RecipeIngredientResponse::from_line(line, &principal)))
    }

    /// Handle GET /recipe-ingredients/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let line = Self::load_visible(&resources, &principal, id).await?;
        Ok(ok(RecipeIngredientResponse::from_line(line, &principal)))
    }

    /// Handle PUT /recipe-ingredients/:id
    async fn handle_replace(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
        Json(body): Json<RecipeIngredientRequest>,
    ) -> Result<Response, AppError> {
        let patch = RecipeIngredientPatch {
            recipe: Some(body.recipe),
            ingredient: Some(body.ingredient),
            quantity: Some(body.quantity),
            measure: Some(body.measure),
        };
        Self::apply_update(&resources, &principal, id, patch).await
    }

    /// Handle PATCH /recipe-ingredients/:id
    async fn handle_patch(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
        Json(patch): Json<RecipeIngredientPatch>,
    ) -> Result<Response, AppError> {
        Self::apply_update(&resources, &principal, id, patch).await
    }

    /// Handle DELETE /recipe-ingredients/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let line = Self::load_visible(&resources, &principal, id).await?;
        check_object_permission(&principal, &line, RequestIntent::Write)?;

        resources
            .database
            .recipe_ingredients()
            .delete_recipe_ingredient(line.id)
            .await?;
        Ok(no_content())
    }

    /// Handle GET /ingredients
    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let entries: Vec<CatalogEntry> = resources
            .database
            .recipe_ingredients()
            .list_ingredients()
            .await?
            .into_iter()
            .map(|i| CatalogEntry {
                id: i.id,
                name: i.name,
            })
            .collect();
        Ok(ok(entries))
    }

    /// Handle GET /measurements
    async fn handle_list_measurements(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let entries: Vec<CatalogEntry> = resources
            .database
            .recipe_ingredients()
            .list_measurements()
            .await?
            .into_iter()
            .map(|m| CatalogEntry {
                id: m.id,
                name: m.measure,
            })
            .collect();
        Ok(ok(entries))
    }

    async fn apply_update(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
        patch: RecipeIngredientPatch,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let line = Self::load_visible(resources, principal, id).await?;
        check_object_permission(principal, &line, RequestIntent::Write)?;

        let recipe_id = patch.recipe.unwrap_or(line.recipe_id);
        if recipe_id != line.recipe_id {
            Self::ensure_recipe_editable(resources, principal, recipe_id).await?;
        }
        let ingredient = IngredientName::parse(patch.ingredient.unwrap_or(line.ingredient))?;
        let measure = MeasurementName::parse(patch.measure.unwrap_or(line.measure))?;
        let quantity = patch.quantity.unwrap_or(line.quantity);
        validate_quantity(&quantity)?;

        let manager = resources.database.recipe_ingredients();
        manager
            .update_recipe_ingredient(id, recipe_id, &ingredient, &quantity, &measure)
            .await?;
        let (updated, _) = manager
            .get_recipe_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe ingredient"))?;

        Ok(ok(RecipeIngredientResponse::from_line(updated, principal)))
    }

    /// The recipe must be visible to the caller and belong to them.
    /// A hidden recipe answers like a missing one.
    async fn ensure_recipe_editable(
        resources: &ServerResources,
        principal: &Principal,
        recipe_id: i64,
    ) -> AppResult<()> {
        let recipe = resources
            .database
            .recipes()
            .get_recipe(recipe_id)
            .await?
            .filter(|r| RecipeVisibility::for_principal(principal).allows(r.owner_id, r.status))
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        ensure_can_edit_ingredients(principal, recipe.owner_id)
    }

    async fn load_visible(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
    ) -> AppResult<RecipeIngredient> {
        let (line, status) = resources
            .database
            .recipe_ingredients()
            .get_recipe_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe ingredient"))?;

        if !RecipeVisibility::for_principal(principal).allows(line.recipe_owner_id, status) {
            return Err(AppError::not_found("Recipe ingredient"));
        }
        Ok(line)
    }
}
