// ABOUTME: Route module organization for the recipe API HTTP endpoints
// ABOUTME: Assembles per-domain routers and the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Route module for the recipe API
//!
//! Each domain module exposes a `*Routes` type with a `routes` constructor
//! and thin handlers. Handlers resolve the principal from the request
//! extension set by [`crate::middleware::authenticate`], apply the access
//! policy from `tasty_core::permissions`, and call a database manager.

/// Registration, login, and current user
pub mod auth;
/// Comment endpoints
pub mod comments;
/// Follower relationship endpoints
pub mod followers;
/// Health check endpoint
pub mod health;
/// Like endpoints
pub mod likes;
/// Profile endpoints
pub mod profiles;
/// Recipe ingredient lines and the ingredient catalog
pub mod recipe_ingredients;
/// Recipe endpoints
pub mod recipes;

pub use auth::{AuthRoutes, LoginRequest, RegisterRequest, TokenResponse, UserResponse};
pub use comments::{CommentResponse, CommentRoutes};
pub use followers::{FollowerResponse, FollowerRoutes};
pub use health::HealthRoutes;
pub use likes::{LikeResponse, LikeRoutes};
pub use profiles::{ProfileResponse, ProfileRoutes};
pub use recipe_ingredients::{RecipeIngredientResponse, RecipeIngredientRoutes};
pub use recipes::{RecipeResponse, RecipeRoutes};

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::extract::DefaultBodyLimit;
use axum::{middleware as axum_middleware, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    authenticate, log_requests, make_request_span, setup_cors, MakePrefixedRequestId,
};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let http = &resources.config.http;
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakePrefixedRequestId))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(setup_cors(http));

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeIngredientRoutes::routes(Arc::clone(&resources)))
        .merge(CommentRoutes::routes(Arc::clone(&resources)))
        .merge(LikeRoutes::routes(Arc::clone(&resources)))
        .merge(FollowerRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .layer(DefaultBodyLimit::max(http.max_request_body_bytes))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&resources),
            authenticate,
        ))
        .layer(axum_middleware::from_fn(log_requests))
        .layer(middleware)
}

/// 200 with a JSON body
pub(crate) fn ok<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

/// 201 with a JSON body
pub(crate) fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

/// 204 with no body
pub(crate) fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
