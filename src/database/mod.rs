// ABOUTME: Database connection management and schema migrations for the recipe API
// ABOUTME: Owns the SQLite pool and hands out per-table managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! # Database Management
//!
//! `SQLite` storage for users, profiles, recipes, ingredients, and social
//! rows. Each table family has a manager that borrows a clone of the pool,
//! in the same shape for every table: `create_*`, `get_*`, `list_*`,
//! `update_*`, `delete_*`.
//!
//! Uniqueness and self-reference rules are enforced by the schema. Managers
//! classify constraint failures with [`DatabaseError::classify`](crate::errors::DatabaseError::classify) so callers
//! can turn them into domain errors.

mod comments;
mod followers;
mod likes;
mod profiles;
mod recipe_ingredients;
mod recipes;
mod transactions;
mod users;

pub use comments::{CommentView, CommentsManager};
pub use followers::{FollowerFilter, FollowerView, FollowersManager};
pub use likes::{LikeView, LikesManager};
pub use profiles::{ProfileFilter, ProfileOrdering, ProfileView, ProfilesManager};
pub use recipe_ingredients::{RecipeIngredientFilter, RecipeIngredientsManager};
pub use recipes::{RecipeOrdering, RecipeQuery, RecipeView, RecipesManager};
pub use transactions::TransactionGuard;
pub use users::UsersManager;

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tasty_core::permissions::{SqlFilter, SqlPart, SqlValue};
use tracing::info;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

/// Database manager holding the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// In-memory databases use a single long-lived connection so every
    /// query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl, max_connections: u32) -> Result<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            ensure_parent_dir(path)?;
        }

        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .with_context(|| format!("Invalid database URL: {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Connection pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verify the database answers queries
    ///
    /// # Errors
    ///
    /// Returns an error if the ping query fails
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database health check failed: {e}")))?;
        Ok(())
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Profiles with derived counts
    #[must_use]
    pub fn profiles(&self) -> ProfilesManager {
        ProfilesManager::new(self.pool.clone())
    }

    /// Recipes
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Recipe ingredient lines and the shared name tables
    #[must_use]
    pub fn recipe_ingredients(&self) -> RecipeIngredientsManager {
        RecipeIngredientsManager::new(self.pool.clone())
    }

    /// Comments
    #[must_use]
    pub fn comments(&self) -> CommentsManager {
        CommentsManager::new(self.pool.clone())
    }

    /// Likes
    #[must_use]
    pub fn likes(&self) -> LikesManager {
        LikesManager::new(self.pool.clone())
    }

    /// Follower relationships
    #[must_use]
    pub fn followers(&self) -> FollowersManager {
        FollowersManager::new(self.pool.clone())
    }

    /// Create every table and index if missing
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> Result<()> {
        let started = Instant::now();
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Migration failed: {}", statement.trim()))?;
        }
        AppLogger::log_database_operation(
            "migrate",
            "all",
            true,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        info!("Database schema ready");
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }
    Ok(())
}

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL DEFAULT '',
        content TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_name TEXT NOT NULL,
        intro TEXT NOT NULL DEFAULT '',
        instruction TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending_publish'
            CHECK (status IN ('pending_publish', 'published', 'pending_delete')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS measurements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        measure TEXT NOT NULL UNIQUE
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
        quantity TEXT NOT NULL,
        measurement_id INTEGER NOT NULL REFERENCES measurements(id) ON DELETE CASCADE
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS likes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE (owner_id, recipe_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS followers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        followed_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE (owner_id, followed_id),
        CHECK (owner_id <> followed_id)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_owner ON recipes(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_status ON recipes(status)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_created ON recipes(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_recipe ON comments(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_likes_recipe ON likes(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_followers_followed ON followers(followed_id)",
];

/// Timestamp format used in every TEXT column; fixed width so it sorts lexically
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid date: {e}")))
}

/// Escape `%`, `_`, and `\` for a `LIKE ... ESCAPE '\'` pattern and wrap in wildcards
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Append a policy-built fragment to a query, binding its values in order
pub(crate) fn push_sql_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &SqlFilter) {
    for part in filter.parts() {
        match part {
            SqlPart::Raw(sql) => {
                builder.push(sql.as_str());
            }
            SqlPart::Bind(SqlValue::Integer(value)) => {
                builder.push_bind(*value);
            }
            SqlPart::Bind(SqlValue::Text(value)) => {
                builder.push_bind(*value);
            }
        }
    }
}
