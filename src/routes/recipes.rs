// ABOUTME: Recipe endpoints with visibility-filtered lists and owner-only writes
// ABOUTME: Hidden recipes are left out of lists and answer 404 on detail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Recipe routes
//!
//! Lists accept `search`, `owner`, `recipe_name`, `created_after`,
//! `created_before`, `status` (comma separated), `ordering`, `page` and
//! `page_size`. Every response carries like and comment counts computed at
//! read time and the recipe's ingredient lines.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tasty_core::models::{Principal, Recipe, RecipeIngredient, RecipeStatus};
use tasty_core::pagination::Page;
use tasty_core::permissions::{check_object_permission, RecipeVisibility, RequestIntent};

use super::{created, no_content, ok, RecipeIngredientResponse};
use crate::constants::images;
use crate::database::{RecipeQuery, RecipeView};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Recipe as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Owner username
    pub owner: String,
    /// Whether the caller owns the recipe
    pub is_owner: bool,
    /// Owner profile id
    pub profile_id: Option<i64>,
    /// Owner profile image
    pub profile_image: Option<String>,
    /// Title
    pub recipe_name: String,
    /// Introduction
    pub intro: String,
    /// Preparation steps
    pub instruction: String,
    /// Image path or URL
    pub image: String,
    /// Publication status
    pub status: RecipeStatus,
    /// Number of likes
    pub likes_count: i64,
    /// Number of comments
    pub comments_count: i64,
    /// The caller's like, if any
    pub like_id: Option<i64>,
    /// Ingredient lines
    pub ingredients: Vec<RecipeIngredientResponse>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

impl RecipeResponse {
    fn from_view(
        view: RecipeView,
        ingredients: Vec<RecipeIngredient>,
        principal: &Principal,
    ) -> Self {
        let recipe = view.recipe;
        Self {
            id: recipe.id,
            owner: view.owner_username,
            is_owner: principal.is_owner(recipe.owner_id),
            profile_id: view.profile_id,
            profile_image: view.profile_image,
            recipe_name: recipe.recipe_name,
            intro: recipe.intro,
            instruction: recipe.instruction,
            image: recipe.image,
            status: recipe.status,
            likes_count: view.likes_count,
            comments_count: view.comments_count,
            like_id: view.like_id,
            ingredients: ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse::from_line(line, principal))
                .collect(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// Query parameters for the recipe list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    /// Substring of owner username, recipe name, or ingredient name
    pub search: Option<String>,
    /// Owner user id
    pub owner: Option<i64>,
    /// Substring of the recipe name
    pub recipe_name: Option<String>,
    /// Created on or after (YYYY-MM-DD)
    pub created_after: Option<NaiveDate>,
    /// Created on or before (YYYY-MM-DD)
    pub created_before: Option<NaiveDate>,
    /// Comma separated statuses
    pub status: Option<String>,
    /// Sort key, `-` prefix for descending
    pub ordering: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
}

/// Body for creating a recipe or editing one; on PUT `recipe_name` is required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeRequest {
    /// Title
    pub recipe_name: Option<String>,
    /// Introduction
    pub intro: Option<String>,
    /// Preparation steps
    pub instruction: Option<String>,
    /// Image path or URL
    pub image: Option<String>,
    /// Publication status
    pub status: Option<String>,
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recipes", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/recipes/:id",
                get(Self::handle_get)
                    .put(Self::handle_replace)
                    .patch(Self::handle_patch)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /recipes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let page_request = resources.page_request(query.page, query.page_size)?;
        let statuses = query
            .status
            .as_deref()
            .map(RecipeStatus::parse_list)
            .transpose()?
            .unwrap_or_default();

        let mut recipe_query =
            RecipeQuery::visible_to(RecipeVisibility::for_principal(&principal).with_statuses(statuses));
        recipe_query.search = query.search;
        recipe_query.owner = query.owner;
        recipe_query.recipe_name = query.recipe_name;
        recipe_query.created_after = query.created_after;
        recipe_query.created_before = query.created_before;
        if let Some(ordering) = query.ordering.as_deref().filter(|o| !o.is_empty()) {
            recipe_query.ordering = ordering.parse()?;
        }

        let (views, count) = resources
            .database
            .recipes()
            .list_recipes(&recipe_query, page_request, principal.user_id())
            .await?;

        let ids: Vec<i64> = views.iter().map(|view| view.recipe.id).collect();
        let mut lines_by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        for line in resources
            .database
            .recipe_ingredients()
            .list_for_recipes(&ids)
            .await?
        {
            lines_by_recipe.entry(line.recipe_id).or_default().push(line);
        }

        let page = Page::new(views, count, page_request)?.map(|view| {
            let lines = lines_by_recipe.remove(&view.recipe.id).unwrap_or_default();
            RecipeResponse::from_view(view, lines, &principal)
        });
        Ok(ok(page))
    }

    /// Handle POST /recipes
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Json(body): Json<RecipeRequest>,
    ) -> Result<Response, AppError> {
        let user = principal.require_user()?;
        let recipe_name = body
            .recipe_name
            .clone()
            .ok_or_else(|| AppError::validation("recipe_name: This field is required."))?;
        Recipe::validate_name(&recipe_name)?;

        let mut recipe = Recipe::new(user.id, recipe_name);
        Self::apply_fields(&mut recipe, body)?;

        let id = resources.database.recipes().create_recipe(&recipe).await?;
        tracing::info!(recipe_id = id, user_id = user.id, "Recipe created");

        let response = Self::load_response(&resources, &principal, id).await?;
        Ok(created(response))
    }

    /// Handle GET /recipes/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Ok(ok(Self::load_response(&resources, &principal, id).await?))
    }

    /// Handle PUT /recipes/:id
    async fn handle_replace(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
        Json(body): Json<RecipeRequest>,
    ) -> Result<Response, AppError> {
        if body.recipe_name.is_none() {
            return Err(AppError::validation("recipe_name: This field is required."));
        }
        Self::apply_update(&resources, &principal, id, body).await
    }

    /// Handle PATCH /recipes/:id
    async fn handle_patch(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
        Json(body): Json<RecipeRequest>,
    ) -> Result<Response, AppError> {
        Self::apply_update(&resources, &principal, id, body).await
    }

    /// Handle DELETE /recipes/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let recipe = Self::load_visible(&resources, &principal, id).await?;
        check_object_permission(&principal, &recipe, RequestIntent::Write)?;

        resources.database.recipes().delete_recipe(recipe.id).await?;
        tracing::info!(recipe_id = recipe.id, "Recipe deleted");
        Ok(no_content())
    }

    async fn apply_update(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
        body: RecipeRequest,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let mut recipe = Self::load_visible(resources, principal, id).await?;
        check_object_permission(principal, &recipe, RequestIntent::Write)?;

        if let Some(name) = &body.recipe_name {
            Recipe::validate_name(name)?;
            recipe.recipe_name.clone_from(name);
        }
        Self::apply_fields(&mut recipe, body)?;

        resources.database.recipes().update_recipe(&recipe).await?;
        Ok(ok(Self::load_response(resources, principal, id).await?))
    }

    /// Copy optional fields other than the name onto `recipe`
    fn apply_fields(recipe: &mut Recipe, body: RecipeRequest) -> AppResult<()> {
        if let Some(intro) = body.intro {
            recipe.intro = intro;
        }
        if let Some(instruction) = body.instruction {
            recipe.instruction = instruction;
        }
        if let Some(image) = body.image {
            recipe.image = if image.trim().is_empty() {
                images::DEFAULT_RECIPE_IMAGE.to_owned()
            } else {
                image
            };
        }
        if let Some(status) = body.status {
            recipe.status = status.parse()?;
        }
        Ok(())
    }

    /// Fetch a recipe row the principal may see, else 404
    async fn load_visible(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
    ) -> AppResult<Recipe> {
        let recipe = resources
            .database
            .recipes()
            .get_recipe(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        if !RecipeVisibility::for_principal(principal).allows(recipe.owner_id, recipe.status) {
            return Err(AppError::not_found("Recipe"));
        }
        Ok(recipe)
    }

    async fn load_response(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
    ) -> AppResult<RecipeResponse> {
        let view = resources
            .database
            .recipes()
            .get_recipe_view(id, principal.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        if !RecipeVisibility::for_principal(principal)
            .allows(view.recipe.owner_id, view.recipe.status)
        {
            return Err(AppError::not_found("Recipe"));
        }

        let lines = resources
            .database
            .recipe_ingredients()
            .list_for_recipes(&[id])
            .await?;
        Ok(RecipeResponse::from_view(view, lines, principal))
    }
}
