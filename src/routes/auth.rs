// ABOUTME: User authentication route handlers for registration, login, and the current user
// ABOUTME: Registration creates the account and its profile and returns a token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! Authentication routes
//!
//! `POST /auth/register` and `POST /auth/login` both answer with a bearer
//! token. `GET /auth/user` returns the account behind the presented token.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasty_core::models::{Principal, User};

use super::{created, ok};
use crate::auth::IssuedToken;
use crate::constants::{limits, messages};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Unique username
    pub username: String,
    /// Plain password
    pub password: String,
    /// Optional contact address
    #[serde(default)]
    pub email: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Plain password
    pub password: String,
}

/// Account data returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User id
    pub id: i64,
    /// Username
    pub username: String,
    /// Contact address
    pub email: Option<String>,
    /// Profile id
    pub profile_id: Option<i64>,
    /// Profile image
    pub profile_image: Option<String>,
}

/// Token issued at registration or login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub token: String,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
    /// The authenticated account
    pub user: UserResponse,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/user", get(Self::handle_current_user))
            .with_state(resources)
    }

    /// Handle POST /auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        Self::validate_username(&request.username)?;
        Self::validate_password(&request.password)?;
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty());

        let password_hash = resources
            .auth_manager
            .hash_password(&request.password)
            .await?;
        let user = resources
            .database
            .users()
            .create_user(&request.username, email, &password_hash)
            .await
            .inspect_err(|e| {
                AppLogger::log_auth_event(&request.username, "register", false, Some(&e.message));
            })?;

        AppLogger::log_auth_event(&user.username, "register", true, None);
        let token = resources.auth_manager.generate_token(&user)?;
        let response = Self::token_response(&resources, &user, token).await?;
        Ok(created(response))
    }

    /// Handle POST /auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .users()
            .get_user_by_username(&request.username)
            .await?;

        let Some(user) = user else {
            AppLogger::log_auth_event(&request.username, "login", false, Some("unknown user"));
            return Err(AppError::auth_invalid(messages::BAD_CREDENTIALS));
        };

        let valid = resources
            .auth_manager
            .verify_password(&request.password, &user.password_hash)
            .await?;
        if !valid {
            AppLogger::log_auth_event(&user.username, "login", false, Some("wrong password"));
            return Err(AppError::auth_invalid(messages::BAD_CREDENTIALS));
        }

        AppLogger::log_auth_event(&user.username, "login", true, None);
        let token = resources.auth_manager.generate_token(&user)?;
        let response = Self::token_response(&resources, &user, token).await?;
        Ok(ok(response))
    }

    /// Handle GET /auth/user
    async fn handle_current_user(
        State(resources): State<Arc<ServerResources>>,
        Extension(principal): Extension<Principal>,
    ) -> Result<Response, AppError> {
        let authenticated = principal.require_user()?;
        let user = resources
            .database
            .users()
            .get_user(authenticated.id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        Ok(ok(Self::user_response(&resources, &user).await?))
    }

    async fn token_response(
        resources: &ServerResources,
        user: &User,
        token: IssuedToken,
    ) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            token: token.token,
            expires_at: token.expires_at,
            user: Self::user_response(resources, user).await?,
        })
    }

    async fn user_response(resources: &ServerResources, user: &User) -> AppResult<UserResponse> {
        let profile = resources
            .database
            .profiles()
            .get_profile_by_owner(user.id)
            .await?;
        Ok(UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            profile_id: profile.as_ref().map(|p| p.id),
            profile_image: profile.map(|p| p.image),
        })
    }

    /// Usernames are 1-150 characters of letters, digits, and `@.+-_`
    fn validate_username(username: &str) -> AppResult<()> {
        if username.is_empty() {
            return Err(AppError::validation("username: This field may not be blank."));
        }
        if username.chars().count() > limits::USERNAME_MAX_LEN {
            return Err(AppError::validation(format!(
                "username: Ensure this field has no more than {} characters.",
                limits::USERNAME_MAX_LEN
            )));
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(AppError::validation(
                "username: Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            ));
        }
        Ok(())
    }

    fn validate_password(password: &str) -> AppResult<()> {
        if password.chars().count() < limits::PASSWORD_MIN_LEN {
            return Err(AppError::validation(format!(
                "password: This password is too short. It must contain at least {} characters.",
                limits::PASSWORD_MIN_LEN
            )));
        }
        Ok(())
    }
}
