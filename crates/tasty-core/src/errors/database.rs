// ABOUTME: Storage error classification for sqlx failures
// ABOUTME: Separates constraint violations from other failures so callers can map them to domain errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use thiserror::Error;

use super::AppError;

/// Database failure, classified by what the caller can do about it
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A CHECK constraint rejected the write
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    /// A FOREIGN KEY constraint rejected the write
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Query returned no row where one was required
    #[error("Row not found")]
    RowNotFound,

    /// Anything else
    #[error("Database operation failed: {0}")]
    Other(#[from] sqlx::Error),
}

/// Result alias for storage operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl DatabaseError {
    /// Classify a raw sqlx error
    #[must_use]
    pub fn classify(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::RowNotFound;
        }
        if let sqlx::Error::Database(db_err) = &error {
            let message = db_err.message().to_owned();
            if db_err.is_unique_violation() || message.contains("UNIQUE constraint failed") {
                return Self::UniqueViolation(message);
            }
            if db_err.is_check_violation() || message.contains("CHECK constraint failed") {
                return Self::CheckViolation(message);
            }
            if db_err.is_foreign_key_violation() || message.contains("FOREIGN KEY constraint failed")
            {
                return Self::ForeignKeyViolation(message);
            }
        }
        Self::Other(error)
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::RowNotFound => Self::not_found("Resource"),
            other => Self::database(other.to_string()).with_source(other),
        }
    }
}
