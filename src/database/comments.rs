// ABOUTME: Comment storage with author display data
// ABOUTME: Comments are listed newest first, optionally filtered by recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tasty_core::models::{Comment, RecipeStatus, UserId};
use tasty_core::pagination::PageRequest;
use tasty_core::permissions::RecipeVisibility;

use super::{format_timestamp, parse_timestamp, push_sql_filter};
use crate::errors::{AppError, AppResult};

/// Comment joined with its author's display data
#[derive(Debug, Clone)]
pub struct CommentView {
    /// The comment row
    pub comment: Comment,
    /// Author username
    pub owner_username: String,
    /// Author profile id
    pub profile_id: Option<i64>,
    /// Author profile image
    pub profile_image: Option<String>,
    /// Owner of the commented recipe
    pub recipe_owner_id: UserId,
    /// Status of the commented recipe
    pub recipe_status: RecipeStatus,
}

impl CommentView {
    /// Whether the commented recipe is visible under `visibility`
    #[must_use]
    pub fn recipe_visible(&self, visibility: &RecipeVisibility) -> bool {
        visibility.allows(self.recipe_owner_id, self.recipe_status)
    }
}

const COMMENT_COLUMNS: &str = r"
    SELECT c.id, c.owner_id, c.recipe_id, c.content, c.created_at, c.updated_at,
           u.username AS owner_username, p.id AS profile_id, p.image AS profile_image,
           r.owner_id AS recipe_owner_id, r.status AS recipe_status
    FROM comments c
    JOIN recipes r ON r.id = c.recipe_id
    JOIN users u ON u.id = c.owner_id
    LEFT JOIN profiles p ON p.owner_id = c.owner_id";

/// Comment database operations
pub struct CommentsManager {
    pool: SqlitePool,
}

impl CommentsManager {
    /// Create a new comments manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a comment and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn create_comment(&self, comment: &Comment) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO comments (owner_id, recipe_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(comment.owner_id)
        .bind(comment.recipe_id)
        .bind(&comment.content)
        .bind(format_timestamp(comment.created_at))
        .bind(format_timestamp(comment.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create comment: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch a comment with author data
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_comment(&self, id: i64) -> AppResult<Option<CommentView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(COMMENT_COLUMNS);
        builder.push(" WHERE c.id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get comment: {e}")))?;

        row.as_ref().map(Self::row_to_view).transpose()
    }

    /// List comments on recipes visible under `visibility`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_comments(
        &self,
        recipe_id: Option<i64>,
        visibility: &RecipeVisibility,
        page: PageRequest,
    ) -> AppResult<(Vec<CommentView>, i64)> {
        let mut count_builder = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM comments c JOIN recipes r ON r.id = c.recipe_id",
        );
        Self::push_where(&mut count_builder, recipe_id, visibility);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count comments: {e}")))?;

        let mut builder = QueryBuilder::<Sqlite>::new(COMMENT_COLUMNS);
        Self::push_where(&mut builder, recipe_id, visibility);
        builder.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list comments: {e}")))?;

        let views = rows
            .iter()
            .map(Self::row_to_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((views, total))
    }

    /// Replace a comment's content
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_comment(&self, id: i64, content: &str) -> AppResult<()> {
        sqlx::query("UPDATE comments SET content = $1, updated_at = $2 WHERE id = $3")
            .bind(content)
            .bind(format_timestamp(Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update comment: {e}")))?;
        Ok(())
    }

    /// Delete a comment
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_comment(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete comment: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    fn push_where(
        builder: &mut QueryBuilder<'_, Sqlite>,
        recipe_id: Option<i64>,
        visibility: &RecipeVisibility,
    ) {
        builder.push(" WHERE ");
        push_sql_filter(builder, &visibility.sql_filter("r.owner_id", "r.status"));
        if let Some(recipe_id) = recipe_id {
            builder.push(" AND c.recipe_id = ");
            builder.push_bind(recipe_id);
        }
    }

    fn row_to_view(row: &SqliteRow) -> AppResult<CommentView> {
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        let recipe_status: String = row.get("recipe_status");
        Ok(CommentView {
            comment: Comment {
                id: row.get("id"),
                owner_id: row.get("owner_id"),
                recipe_id: row.get("recipe_id"),
                content: row.get("content"),
                created_at: parse_timestamp(&created_at)?,
                updated_at: parse_timestamp(&updated_at)?,
            },
            owner_username: row.get("owner_username"),
            profile_id: row.get("profile_id"),
            profile_image: row.get("profile_image"),
            recipe_owner_id: row.get("recipe_owner_id"),
            recipe_status: RecipeStatus::from_str(&recipe_status)
                .map_err(|e| AppError::database(format!("Invalid recipe status: {e}")))?,
        })
    }
}
