// ABOUTME: Follower relationship storage; unique per pair and never self-referential
// ABOUTME: Both rules live in the schema so concurrent inserts cannot break them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tasty_core::models::{Follower, UserId};
use tasty_core::pagination::PageRequest;

use super::{format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult, DatabaseError, DatabaseResult};

/// Follower row joined with both usernames
#[derive(Debug, Clone)]
pub struct FollowerView {
    /// The relationship row
    pub follower: Follower,
    /// Username of the follower
    pub owner_username: String,
    /// Username of the followed user
    pub followed_username: String,
}

/// Filters for the follower list
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowerFilter {
    /// Rows created by this user
    pub owner: Option<UserId>,
    /// Rows pointing at this user
    pub followed: Option<UserId>,
}

const FOLLOWER_COLUMNS: &str = r"
    SELECT f.id, f.owner_id, f.followed_id, f.created_at,
           owner.username AS owner_username, followed.username AS followed_username
    FROM followers f
    JOIN users owner ON owner.id = f.owner_id
    JOIN users followed ON followed.id = f.followed_id";

/// Follower database operations
pub struct FollowersManager {
    pool: SqlitePool,
}

impl FollowersManager {
    /// Create a new followers manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a follow. Duplicates fail with [`DatabaseError::UniqueViolation`],
    /// self-follows with [`DatabaseError::CheckViolation`].
    ///
    /// # Errors
    ///
    /// Returns a classified storage error if the insert fails
    pub async fn create_follower(
        &self,
        owner_id: UserId,
        followed_id: UserId,
    ) -> DatabaseResult<Follower> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO followers (owner_id, followed_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(owner_id)
        .bind(followed_id)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(Follower {
            id: result.last_insert_rowid(),
            owner_id,
            followed_id,
            created_at,
        })
    }

    /// Fetch a follower row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_follower(&self, id: i64) -> AppResult<Option<FollowerView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(FOLLOWER_COLUMNS);
        builder.push(" WHERE f.id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get follower: {e}")))?;

        row.as_ref().map(Self::row_to_view).transpose()
    }

    /// List follower rows, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_followers(
        &self,
        filter: FollowerFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<FollowerView>, i64)> {
        let mut count_builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM followers f");
        Self::push_where(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count followers: {e}")))?;

        let mut builder = QueryBuilder::<Sqlite>::new(FOLLOWER_COLUMNS);
        Self::push_where(&mut builder, filter);
        builder.push(" ORDER BY f.created_at DESC, f.id DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list followers: {e}")))?;

        let views = rows
            .iter()
            .map(Self::row_to_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((views, total))
    }

    /// Delete a follower row (unfollow)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_follower(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM followers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete follower: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, filter: FollowerFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(owner) = filter.owner {
            builder.push(" AND f.owner_id = ");
            builder.push_bind(owner);
        }
        if let Some(followed) = filter.followed {
            builder.push(" AND f.followed_id = ");
            builder.push_bind(followed);
        }
    }

    fn row_to_view(row: &SqliteRow) -> AppResult<FollowerView> {
        let created_at: String = row.get("created_at");
        Ok(FollowerView {
            follower: Follower {
                id: row.get("id"),
                owner_id: row.get("owner_id"),
                followed_id: row.get("followed_id"),
                created_at: parse_timestamp(&created_at)?,
            },
            owner_username: row.get("owner_username"),
            followed_username: row.get("followed_username"),
        })
    }
}
