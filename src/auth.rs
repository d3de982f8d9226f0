// ABOUTME: JWT-based user authentication with HS256 tokens and bcrypt password hashing
// ABOUTME: Issues and validates tokens and resolves them to an authenticated principal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! # Authentication
//!
//! Tokens are HS256 JWTs carrying the user id in `sub` and the username,
//! scoped to a fixed audience. Password hashing runs on the blocking pool.

use std::error::Error;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tasty_core::models::{AuthenticatedUser, User};
use tokio::task;

use crate::config::AuthConfig;
use crate::constants::defaults::JWT_AUDIENCE;
use crate::errors::{AppError, AppResult};

/// JWT validation failure with detail for logs
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Signature, audience, or claim check failed
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Not a well-formed JWT
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "JWT token expired at {}",
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
        }
    }
}

impl Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        let message = match &error {
            JwtValidationError::TokenExpired { .. } => "Token has expired.",
            JwtValidationError::TokenInvalid { .. } | JwtValidationError::TokenMalformed { .. } => {
                "Invalid token."
            }
        };
        Self::auth_invalid(message).with_source(error)
    }
}

/// JWT claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Issued at (seconds)
    pub iat: i64,
    /// Expiration (seconds)
    pub exp: i64,
    /// Audience
    pub aud: String,
}

impl Claims {
    /// Resolve the claims to the user they were issued for
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if `sub` is not a user id
    pub fn authenticated_user(&self) -> Result<AuthenticatedUser, JwtValidationError> {
        let id = self
            .sub
            .parse()
            .map_err(|_| JwtValidationError::TokenInvalid {
                reason: format!("subject is not a user id: {}", self.sub),
            })?;
        Ok(AuthenticatedUser {
            id,
            username: self.username.clone(),
        })
    }
}

/// Token issued at login or registration
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
}

/// Authentication manager for JWT tokens and password hashes
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    password_hash_cost: u32,
}

impl AuthManager {
    /// Build a manager from the auth section of the server config
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            token_expiry_hours: config.jwt_expiry_hours,
            password_hash_cost: config.password_hash_cost,
        }
    }

    /// Generate a token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.token_expiry_hours);
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            aud: JWT_AUDIENCE.to_owned(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is expired, forged,
    /// issued for another audience, or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JWT_AUDIENCE]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e, token, &self.decoding_key))
    }

    fn convert_jwt_error(
        e: &JwtError,
        token: &str,
        key: &DecodingKey,
    ) -> JwtValidationError {
        tracing::debug!("JWT validation failed: {:?}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => {
                let mut lenient = Validation::new(Algorithm::HS256);
                lenient.validate_exp = false;
                lenient.set_audience(&[JWT_AUDIENCE]);
                let expired_at = decode::<Claims>(token, key, &lenient)
                    .ok()
                    .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
                    .unwrap_or_else(Utc::now);
                JwtValidationError::TokenExpired { expired_at }
            }
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "unexpected audience".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "token format is invalid".into(),
            },
            ErrorKind::Base64(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid base64: {err}"),
            },
            ErrorKind::Json(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid JSON: {err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: e.to_string(),
            },
        }
    }

    /// Hash a password on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or the task panics
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.password_hash_cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
    }

    /// Check a password against a stored hash on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is unreadable or the task panics
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
    }
}

/// Generate a random JWT secret from the OS RNG
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    OsRng.fill_bytes(&mut secret);
    secret
}
