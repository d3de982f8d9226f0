// ABOUTME: Request authentication resolving bearer tokens to a principal
// ABOUTME: Missing credentials yield an anonymous principal; bad credentials are rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use tasty_core::models::Principal;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Resolves the `Authorization` header of a request to a [`Principal`]
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
    database: Database,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: AuthManager, database: Database) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` if an `Authorization` header is present but is
    /// not a valid bearer token for an existing user
    #[tracing::instrument(skip(self, headers), fields(user_id = tracing::field::Empty))]
    pub async fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<Principal> {
        if !headers.contains_key(header::AUTHORIZATION) {
            return Ok(Principal::Anonymous);
        }

        let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
            AppLogger::log_security_event("auth_header_rejected", "not a bearer token", None);
            return Err(AppError::auth_invalid("Invalid authorization header."));
        };

        let claims = self.auth_manager.validate_token(bearer.token()).map_err(|e| {
            AppLogger::log_security_event("token_rejected", &e.to_string(), None);
            AppError::from(e)
        })?;
        let user = claims.authenticated_user()?;

        // Tokens outlive accounts; a deleted user must not keep acting
        if self.database.users().get_user(user.id).await?.is_none() {
            AppLogger::log_security_event("token_for_missing_user", &claims.sub, Some(user.id));
            return Err(AppError::auth_invalid("User not found."));
        }

        tracing::Span::current().record("user_id", user.id);
        Ok(Principal::User(user))
    }
}

/// Axum middleware inserting the request's [`Principal`] as an extension.
/// The principal is also copied onto the response for the request logger.
///
/// # Errors
///
/// Rejects the request with 401 when credentials are present but invalid
pub async fn authenticate(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resources
        .auth_middleware
        .authenticate_request(request.headers())
        .await?;
    if let Some(user_id) = principal.user_id() {
        tracing::Span::current().record("user_id", user_id);
    }
    request.extensions_mut().insert(principal.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    Ok(response)
}
