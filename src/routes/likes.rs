// ABOUTME: Like endpoints; one like per user and recipe
// ABOUTME: A repeated like answers with a validation error instead of a second row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasty_core::models::Principal;
use tasty_core::pagination::Page;
use tasty_core::permissions::{
    check_object_permission, RecipeVisibility, RelationshipKind, RequestIntent,
};

use super::{created, no_content, ok};
use crate::database::LikeView;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Like as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    /// Like id
    pub id: i64,
    /// Liker username
    pub owner: String,
    /// Recipe id
    pub recipe: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl From<LikeView> for LikeResponse {
    fn from(view: LikeView) -> Self {
        Self {
            id: view.like.id,
            owner: view.owner_username,
            recipe: view.like.recipe_id,
            created_at: view.like.created_at,
        }
    }
}

/// Query parameters for the like list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeListQuery {
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
}

/// Body for liking a recipe
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLikeRequest {
    /// Recipe id
    pub recipe: i64,
}

/// Like routes handler
pub struct LikeRoutes;

impl LikeRoutes {
    /// Create all like routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/likes", get(Self::handle_list).post(Self::handle_create))
            .route("/likes/:id", get(Self::handle_get).delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /likes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Query(query): Query<LikeListQuery>,
    ) -> Result<Response, AppError> {
        let page_request = resources.page_request(query.page, query.page_size)?;
        let (views, count) = resources
            .database
            .likes()
            .list_likes(&RecipeVisibility::for_principal(&principal), page_request)
            .await?;
        Ok(ok(Page::new(views, count, page_request)?.map(LikeResponse::from)))
    }

    /// Handle POST /likes
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Json(body): Json<CreateLikeRequest>,
    ) -> Result<Response, AppError> {
        let user = principal.require_user()?;
        let recipe = resources
            .database
            .recipes()
            .get_recipe(body.recipe)
            .await?
            .filter(|r| RecipeVisibility::for_principal(&principal).allows(r.owner_id, r.status))
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        let likes = resources.database.likes();
        let like = likes
            .create_like(user.id, recipe.id)
            .await
            .map_err(|e| RelationshipKind::Like.translate_insert_error(e))?;
        let view = likes
            .get_like(like.id)
            .await?
            .ok_or_else(|| AppError::internal("Created like vanished"))?;

        Ok(created(LikeResponse::from(view)))
    }

    /// Handle GET /likes/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Ok(ok(LikeResponse::from(
            Self::load(&resources, &principal, id).await?,
        )))
    }

    /// Handle DELETE /likes/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let view = Self::load(&resources, &principal, id).await?;
        check_object_permission(&principal, &view.like, RequestIntent::Write)?;

        resources.database.likes().delete_like(id).await?;
        Ok(no_content())
    }

    async fn load(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
    ) -> AppResult<LikeView> {
        resources
            .database
            .likes()
            .get_like(id)
            .await?
            .filter(|view| view.recipe_visible(&RecipeVisibility::for_principal(principal)))
            .ok_or_else(|| AppError::not_found("Like"))
    }
}
