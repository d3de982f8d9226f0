// ABOUTME: Profile endpoints with follower and recipe counts derived at read time
// ABOUTME: Profiles are created with their user, so there is no create or delete here
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
use tasty_core::permissions::{check_object_permission, RequestIntent};

use super::ok;
use crate::constants::{images, limits};
use crate::database::{ProfileFilter, ProfileOrdering, ProfileView};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Profile as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Profile id
    pub id: i64,
    /// Owner username
    pub owner: String,
    /// Whether the caller owns the profile
    pub is_owner: bool,
    /// Display name
    pub name: String,
    /// About text
    pub content: String,
    /// Avatar path or URL
    pub image: String,
    /// The caller's follower row for this profile's owner, if any
    pub following_id: Option<i64>,
    /// Recipes owned
    pub recipes_count: i64,
    /// Users following the owner
    pub followers_count: i64,
    /// Users the owner follows
    pub following_count: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    fn from_view(view: ProfileView, principal: &Principal) -> Self {
        let profile = view.profile;
        Self {
            id: profile.id,
            owner: view.owner_username,
            is_owner: principal.is_owner(profile.owner_id),
            name: profile.name,
            content: profile.content,
            image: profile.image,
            following_id: view.following_id,
            recipes_count: view.counts.recipes_count,
            followers_count: view.counts.followers_count,
            following_count: view.counts.following_count,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Query parameters for the profile list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileListQuery {
    /// Profiles whose owner follows the owner of this profile id
    pub follows_profile: Option<i64>,
    /// Profiles whose owner is followed by the owner of this profile id
    pub followed_by_profile: Option<i64>,
    /// Sort key, `-` prefix for descending
    pub ordering: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
}

/// Body for editing a profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    /// Display name
    pub name: Option<String>,
    /// About text
    pub content: Option<String>,
    /// Avatar path or URL
    pub image: Option<String>,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/profiles", get(Self::handle_list))
            .route(
                "/profiles/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .patch(Self::handle_update),
            )
            .with_state(resources)
    }

    /// Handle GET /profiles
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Query(query): Query<ProfileListQuery>,
    ) -> Result<Response, AppError> {
        let page_request = resources.page_request(query.page, query.page_size)?;
        let ordering = match query.ordering.as_deref().filter(|o| !o.is_empty()) {
            Some(raw) => raw.parse()?,
            None => ProfileOrdering::default(),
        };
        let filter = ProfileFilter {
            follows_profile: query.follows_profile,
            followed_by_profile: query.followed_by_profile,
        };

        let (views, count) = resources
            .database
            .profiles()
            .list_profiles(filter, ordering, page_request, principal.user_id())
            .await?;

        let page = Page::new(views, count, page_request)?
            .map(|view| ProfileResponse::from_view(view, &principal));
        Ok(ok(page))
    }

    /// Handle GET /profiles/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let view = Self::load(&resources, &principal, id).await?;
        Ok(ok(ProfileResponse::from_view(view, &principal)))
    }

    /// Handle PUT and PATCH /profiles/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
        Path(id): Path<i64>,
        Json(body): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        principal.require_user()?;
        let mut profile = Self::load(&resources, &principal, id).await?.profile;
        check_object_permission(&principal, &profile, RequestIntent::Write)?;

        if let Some(name) = body.name {
            if name.chars().count() > limits::PROFILE_NAME_MAX_LEN {
                return Err(AppError::validation(format!(
                    "name: Ensure this field has no more than {} characters.",
                    limits::PROFILE_NAME_MAX_LEN
                )));
            }
            profile.name = name;
        }
        if let Some(content) = body.content {
            profile.content = content;
        }
        if let Some(image) = body.image {
            profile.image = if image.trim().is_empty() {
                images::DEFAULT_PROFILE_IMAGE.to_owned()
            } else {
                image
            };
        }

        resources.database.profiles().update_profile(&profile).await?;
        let updated = Self::load(&resources, &principal, id).await?;
        Ok(ok(ProfileResponse::from_view(updated, &principal)))
    }

    async fn load(
        resources: &ServerResources,
        principal: &Principal,
        id: i64,
    ) -> AppResult<ProfileView> {
        resources
            .database
            .profiles()
            .get_profile_view(id, principal.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("Profile"))
    }
}
