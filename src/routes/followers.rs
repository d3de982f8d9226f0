// ABOUTME: Follower endpoints; follow, list, and unfollow
// ABOUTME: Self-follows and repeated follows are rejected with validation errors
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
    check_object_permission, validate_follow, RelationshipKind, RequestIntent,
};

use super::{created, no_content, ok};
use crate::database::{FollowerFilter, FollowerView};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Follower row as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerResponse {
    /// Row id
    pub id: i64,
    /// Follower username
    pub owner: String,
    /// Followed user id
    pub followed: i64,
    /// Followed username
    pub followed_name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl From<FollowerView> for FollowerResponse {
    fn from(view: FollowerView) -> Self {
        Self {
            id: view.follower.id,
            owner: view.owner_username,
            followed: view.follower.followed_id,
            followed_name: view.followed_username,
            created_at: view.follower.created_at,
        }
    }
}

/// Query parameters for the follower list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowerListQuery {
    /// Rows created by this user id
    pub owner: Option<i64>,
    /// Rows pointing at this user id
    pub followed: Option<i64>,
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
}

/// Body for following a user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFollowerRequest {
    /// User id to follow
    pub followed: i64,
}

/// Follower routes handler
pub struct FollowerRoutes;

impl FollowerRoutes {
    /// Create all follower routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/followers", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/followers/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /followers
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<FollowerListQuery>,
    ) -> Result<Response, AppError> {
        let page_request = resources.page_request(query.page, query.page_size)?;
        let filter = FollowerFilter {
            owner: query.owner,
            followed: query.followed,
        };
        let (views, count) = resources
            .database
            .followers()
            .list_followers(filter, page_request)
            .await?;
        Ok(ok(Page::new(views, count, page_request)?.map(FollowerResponse::from)))
    }

    /// Handle POST /followers
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Json(body): Json<CreateFollowerRequest>,
    ) -> Result<Response, AppError> {
        let user = principal.require_user()?;
        validate_follow(user.id, body.followed)?;

        if resources
            .database
            .users()
            .get_user(body.followed)
            .await?
            .is_none()
        {
            return Err(AppError::validation(format!(
                "followed: Invalid pk \"{}\" - object does not exist.",
                body.followed
            )));
        }

        let followers = resources.database.followers();
        let follower = followers
            .create_follower(user.id, body.followed)
            .await
            .map_err(|e| RelationshipKind::Follow.translate_insert_error(e))?;
        let view = followers
            .get_follower(follower.id)
            .await?
            .ok_or_else(|| AppError::internal("Created follower vanished"))?;

        Ok(created(FollowerResponse::from(view)))
    }

    /// Handle GET /followers/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Ok(ok(FollowerResponse::from(Self::load(&resources, id).await?)))
    }

    /// Handle DELETE /followers/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let view = Self::load(&resources, id).await?;
        check_object_permission(&principal, &view.follower, RequestIntent::Write)?;

        resources.database.followers().delete_follower(id).await?;
        Ok(no_content())
    }

    async fn load(resources: &ServerResources, id: i64) -> AppResult<FollowerView> {
        resources
            .database
            .followers()
            .get_follower(id)
            .await?
            .ok_or_else(|| AppError::not_found("Follower"))
    }
}
