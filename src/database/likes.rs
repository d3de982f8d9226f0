// ABOUTME: Like storage; one like per user and recipe, enforced by the schema
// ABOUTME: Duplicate inserts surface as classified unique violations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tasty_core::models::{Like, RecipeStatus, UserId};
use tasty_core::pagination::PageRequest;
use tasty_core::permissions::RecipeVisibility;

use super::{format_timestamp, parse_timestamp, push_sql_filter};
use crate::errors::{AppError, AppResult, DatabaseError, DatabaseResult};

/// Like joined with display names
#[derive(Debug, Clone)]
pub struct LikeView {
    /// The like row
    pub like: Like,
    /// Username of the liker
    pub owner_username: String,
    /// Owner of the liked recipe
    pub recipe_owner_id: UserId,
    /// Status of the liked recipe
    pub recipe_status: RecipeStatus,
}

impl LikeView {
    /// Whether the liked recipe is visible under `visibility`
    #[must_use]
    pub fn recipe_visible(&self, visibility: &RecipeVisibility) -> bool {
        visibility.allows(self.recipe_owner_id, self.recipe_status)
    }
}

const LIKE_COLUMNS: &str = r"
    SELECT l.id, l.owner_id, l.recipe_id, l.created_at, u.username AS owner_username,
           r.owner_id AS recipe_owner_id, r.status AS recipe_status
    FROM likes l
    JOIN recipes r ON r.id = l.recipe_id
    JOIN users u ON u.id = l.owner_id";

/// Like database operations
pub struct LikesManager {
    pool: SqlitePool,
}

impl LikesManager {
    /// Create a new likes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a like. A second like for the same pair fails with
    /// [`DatabaseError::UniqueViolation`].
    ///
    /// # Errors
    ///
    /// Returns a classified storage error if the insert fails
    pub async fn create_like(&self, owner_id: UserId, recipe_id: i64) -> DatabaseResult<Like> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO likes (owner_id, recipe_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(owner_id)
        .bind(recipe_id)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(Like {
            id: result.last_insert_rowid(),
            owner_id,
            recipe_id,
            created_at,
        })
    }

    /// Fetch a like
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_like(&self, id: i64) -> AppResult<Option<LikeView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(LIKE_COLUMNS);
        builder.push(" WHERE l.id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get like: {e}")))?;

        row.as_ref().map(Self::row_to_view).transpose()
    }

    /// List likes on recipes visible under `visibility`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_likes(
        &self,
        visibility: &RecipeVisibility,
        page: PageRequest,
    ) -> AppResult<(Vec<LikeView>, i64)> {
        let mut count_builder = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM likes l JOIN recipes r ON r.id = l.recipe_id WHERE ",
        );
        push_sql_filter(&mut count_builder, &visibility.sql_filter("r.owner_id", "r.status"));
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count likes: {e}")))?;

        let mut builder = QueryBuilder::<Sqlite>::new(LIKE_COLUMNS);
        builder.push(" WHERE ");
        push_sql_filter(&mut builder, &visibility.sql_filter("r.owner_id", "r.status"));
        builder.push(" ORDER BY l.created_at DESC, l.id DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list likes: {e}")))?;

        let views = rows
            .iter()
            .map(Self::row_to_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((views, total))
    }

    /// Delete a like
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_like(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete like: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_view(row: &SqliteRow) -> AppResult<LikeView> {
        let created_at: String = row.get("created_at");
        let recipe_status: String = row.get("recipe_status");
        Ok(LikeView {
            like: Like {
                id: row.get("id"),
                owner_id: row.get("owner_id"),
                recipe_id: row.get("recipe_id"),
                created_at: parse_timestamp(&created_at)?,
            },
            owner_username: row.get("owner_username"),
            recipe_owner_id: row.get("recipe_owner_id"),
            recipe_status: RecipeStatus::from_str(&recipe_status)
                .map_err(|e| AppError::database(format!("Invalid recipe status: {e}")))?,
        })
    }
}
