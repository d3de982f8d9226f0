// ABOUTME: User account storage; registering a user also creates their profile
// ABOUTME: Account and profile inserts share one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tasty_core::constants::{images, messages};
use tasty_core::models::{User, UserId};

use super::{format_timestamp, parse_timestamp, TransactionGuard};
use crate::errors::{AppError, AppResult, DatabaseError};

/// User account database operations
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user and their empty profile
    ///
    /// # Errors
    ///
    /// Returns a validation error if the username is taken, or a database
    /// error if either insert fails
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> AppResult<User> {
        let created_at = Utc::now();
        let timestamp = format_timestamp(created_at);
        let mut guard = TransactionGuard::begin(&self.pool).await?;

        let user_id = sqlx::query(
            r"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(&timestamp)
        .execute(guard.executor()?)
        .await
        .map_err(|e| match DatabaseError::classify(e) {
            DatabaseError::UniqueViolation(_) => AppError::validation(messages::USERNAME_TAKEN),
            other => AppError::database(format!("Failed to create user: {other}")),
        })?
        .last_insert_rowid();

        sqlx::query(
            r"
            INSERT INTO profiles (owner_id, name, content, image, created_at, updated_at)
            VALUES ($1, '', '', $2, $3, $3)
            ",
        )
        .bind(user_id)
        .bind(images::DEFAULT_PROFILE_IMAGE)
        .bind(&timestamp)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to create profile: {e}")))?;

        guard.commit().await?;

        Ok(User {
            id: user_id,
            username: username.to_owned(),
            email: email.map(str::to_owned),
            password_hash: password_hash.to_owned(),
            created_at,
        })
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Look up a user by exact username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Delete a user; the schema cascades to everything they own
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_user(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let created_at: String = row.get("created_at");
        Ok(User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: parse_timestamp(&created_at)?,
        })
    }
}
