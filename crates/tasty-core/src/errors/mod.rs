// ABOUTME: Unified error handling with error codes, HTTP status mapping, and JSON bodies
// ABOUTME: Every handler and policy check in the platform returns AppError on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! # Unified Error Handling System
//!
//! Standard error codes, the `AppError` value returned across the crate
//! boundary, and the JSON shape clients receive. The four domain outcomes
//! of the access policy map onto distinct codes:
//!
//! | Outcome | Code | Status |
//! |---|---|---|
//! | non-owner mutation | `PERMISSION_DENIED` | 403 |
//! | domain rule violated | `VALIDATION_FAILED` | 400 |
//! | hidden or absent resource | `RESOURCE_NOT_FOUND` | 404 |
//! | anonymous or bad credentials | `AUTH_REQUIRED` / `AUTH_INVALID` | 401 |

#[cfg(feature = "database-errors")]
pub mod database;

#[cfg(feature = "database-errors")]
pub use database::{DatabaseError, DatabaseResult};

use std::error::Error as StdError;
use std::fmt;

#[cfg(feature = "http-response")]
use axum::response::{IntoResponse, Response};
#[cfg(feature = "http-response")]
use axum::Json;
#[cfg(feature = "http-response")]
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::messages;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// No credentials on a request that needs them
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// Credentials presented but rejected
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// Authenticated, but not the owner
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,

    /// A field failed validation
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed,
    /// Malformed query or body
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,

    /// Missing, or hidden from the caller
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    /// Invalid server configuration
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,

    /// Unexpected server failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
    /// Storage failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Encoding or decoding failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
}

impl ErrorCode {
    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::ValidationFailed | Self::InvalidInput => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => 500,
        }
    }

    /// User-facing description used when the message is not safe to expose
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => messages::AUTH_REQUIRED,
            Self::AuthInvalid => "The provided authentication credentials are invalid.",
            Self::PermissionDenied => messages::PERMISSION_DENIED,
            Self::ValidationFailed | Self::InvalidInput => "The request failed validation.",
            Self::ResourceNotFound => "Not found.",
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => "An internal server error occurred.",
        }
    }

    /// Whether the message may be shown to the client verbatim
    #[must_use]
    pub const fn is_client_facing(self) -> bool {
        self.http_status() < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthInvalid => "AUTH_INVALID",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
        };
        f.write_str(name)
    }
}

/// Application error carrying a code, a message, and an optional cause
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Classification used for status mapping
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl AppError {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Anonymous principal attempted something that needs an identity
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, messages::AUTH_REQUIRED)
    }

    /// Credentials or token were rejected
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Ownership guard denied a mutation
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(ErrorCode::PermissionDenied, messages::PERMISSION_DENIED)
    }

    /// A domain rule was violated
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Malformed request parameters
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource absent or hidden from the caller
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found.", resource.into()),
        )
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Storage failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Message safe to send to the client
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.code.is_client_facing() {
            self.message.clone()
        } else {
            self.code.description().to_owned()
        }
    }
}

/// JSON body returned for every error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Message shown to the user
    pub detail: String,
    /// Machine readable code
    pub code: ErrorCode,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            detail: error.client_message(),
            code: error.code,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("Serialization failed: {error}"),
        )
        .with_source(error)
    }
}

#[cfg(feature = "http-response")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = %self.code, error = %self.message, "Request failed");
        } else {
            tracing::debug!(code = %self.code, error = %self.message, "Request rejected");
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Result type alias used across the platform
pub type AppResult<T> = Result<T, AppError>;
