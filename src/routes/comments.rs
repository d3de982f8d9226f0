// ABOUTME: Comment endpoints; anyone may read, authors alone may edit or delete
// ABOUTME: New comments may only target recipes the author can see
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
use tasty_core::models::{Comment, Principal};
use tasty_core::pagination::Page;
use tasty_core::permissions::{check_object_permission, RecipeVisibility, RequestIntent};

use super::{created, no_content, ok};
use crate::database::CommentView;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Comment as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    /// Comment id
    pub id: i64,
    /// Author username
    pub owner: String,
    /// Whether the caller wrote it
    pub is_owner: bool,
    /// Author profile id
    pub profile_id: Option<i64>,
    /// Author profile image
    pub profile_image: Option<String>,
    /// Recipe id
    pub recipe: i64,
    /// Text
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    fn from_view(view: CommentView, principal: &Principal) -> Self {
        Self {
            id: view.comment.id,
            owner: view.owner_username,
            is_owner: principal.is_owner(view.comment.owner_id),
            profile_id: view.profile_id,
            profile_image: view.profile_image,
            recipe: view.comment.recipe_id,
            content: view.comment.content,
            created_at: view.comment.created_at,
            updated_at: view.comment.updated_at,
        }
    }
}

/// Query parameters for the comment list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListQuery {
    /// Recipe id
    pub recipe: Option<i64>,
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
}

/// Body for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    /// Recipe id
    pub recipe: i64,
    /// Text
    pub content: String,
}

/// Body for editing a comment; the recipe cannot change
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentRequest {
    /// Text
    pub content: String,
}

/// Comment routes handler
pub struct CommentRoutes;

impl CommentRoutes {
    /// Create all comment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/comments", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/comments/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /comments
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Query(query): Query<CommentListQuery>,
    ) -> Result<Response, AppError> {
        let page_request = resources.page_request(query.page, query.page_size)?;
        let (views, count) = resources
            .database
            .comments()
            .list_comments(
                query.recipe,
                &RecipeVisibility::for_principal(&principal),
                page_request,
            )
            .await?;

        let page = Page::new(views, count, page_request)?
            .map(|view| CommentResponse::from_view(view, &principal));
        Ok(ok(page))
    }

    /// Handle POST /comments
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Json(body): Json<CreateCommentRequest>,
    ) -> Result<Response, AppError> {
        let user = principal.require_user()?;
        Self::validate_content(&body.content)?;

        let recipe = resources
            .database
            .recipes()
            .get_recipe(body.recipe)
            .await?
            .filter(|r| RecipeVisibility::for_principal(&principal).allows(r.owner_id, r.status))
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        let comment = Comment::new(user.id, recipe.id, body.content);
        let id = resources.database.comments().create_comment(&comment).await?;
        let view = Self::load(&resources, &principal, id).await?;

        Ok(created(CommentResponse::from_view(view, &principal)))
    }

    /// Handle GET /comments/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let view = Self::load(&resources, &principal, id).await?;
        Ok(ok(CommentResponse::from_view(view, &principal)))
    }

    /// Handle PUT and PATCH /comments/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
        Json(body): Json<UpdateCommentRequest>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let view = Self::load(&resources, &principal, id).await?;
        check_object_permission(&principal, &view.comment, RequestIntent::Write)?;
        Self::validate_content(&body.content)?;

        resources
            .database
            .comments()
            .update_comment(id, &body.content)
            .await?;
        let updated = Self::load(&resources, &principal, id).await?;
        Ok(ok(CommentResponse::from_view(updated, &principal)))
    }

    /// Handle DELETE /comments/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let view = Self::load(&resources, &principal, id).await?;
        check_object_permission(&principal, &view.comment, RequestIntent::Write)?;

        resources.database.comments().delete_comment(id).await?;
        Ok(no_content())
    }

    /// A comment whose recipe the principal cannot see does not exist for them
    async fn load(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
    ) -> AppResult<CommentView> {
        resources
            .database
            .comments()
            .get_comment(id)
            .await?
            .filter(|view| view.recipe_visible(&RecipeVisibility::for_principal(principal)))
            .ok_or_else(|| AppError::not_found("Comment"))
    }

    fn validate_content(content: &str) -> AppResult<()> {
        if content.trim().is_empty() {
            return Err(AppError::validation("content: This field may not be blank."));
        }
        Ok(())
    }
}
