// ABOUTME: Recipe storage with visibility-filtered listing, search, and derived counts
// ABOUTME: Likes and comments counts are computed per query, never stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tasty_core::models::{Recipe, RecipeStatus, UserId};
use tasty_core::pagination::PageRequest;
use tasty_core::permissions::RecipeVisibility;

use super::{contains_pattern, format_timestamp, parse_timestamp, push_sql_filter};
use crate::errors::{AppError, AppResult};

/// Recipe joined with its owner's display data and derived counts
#[derive(Debug, Clone)]
pub struct RecipeView {
    /// The recipe row
    pub recipe: Recipe,
    /// Owner username
    pub owner_username: String,
    /// Owner profile id
    pub profile_id: Option<i64>,
    /// Owner profile image
    pub profile_image: Option<String>,
    /// Number of likes
    pub likes_count: i64,
    /// Number of comments
    pub comments_count: i64,
    /// The viewer's like on this recipe, if any
    pub like_id: Option<i64>,
}

/// Sort key for recipe lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOrdering {
    /// Newest or oldest first
    CreatedAt {
        /// Descending when true
        descending: bool,
    },
    /// By like count
    LikesCount {
        /// Descending when true
        descending: bool,
    },
    /// By comment count
    CommentsCount {
        /// Descending when true
        descending: bool,
    },
}

impl Default for RecipeOrdering {
    fn default() -> Self {
        Self::CreatedAt { descending: true }
    }
}

impl FromStr for RecipeOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, field) = s
            .strip_prefix('-')
            .map_or((false, s), |field| (true, field));
        match field {
            "created_at" => Ok(Self::CreatedAt { descending }),
            "likes_count" => Ok(Self::LikesCount { descending }),
            "comments_count" => Ok(Self::CommentsCount { descending }),
            other => Err(AppError::invalid_input(format!(
                "Invalid ordering field: {other}"
            ))),
        }
    }
}

impl RecipeOrdering {
    fn order_by(self) -> &'static str {
        match self {
            Self::CreatedAt { descending: true } => " ORDER BY r.created_at DESC, r.id DESC",
            Self::CreatedAt { descending: false } => " ORDER BY r.created_at ASC, r.id ASC",
            Self::LikesCount { descending: true } => " ORDER BY likes_count DESC, r.created_at DESC, r.id DESC",
            Self::LikesCount { descending: false } => " ORDER BY likes_count ASC, r.created_at DESC, r.id DESC",
            Self::CommentsCount { descending: true } => {
                " ORDER BY comments_count DESC, r.created_at DESC, r.id DESC"
            }
            Self::CommentsCount { descending: false } => {
                " ORDER BY comments_count ASC, r.created_at DESC, r.id DESC"
            }
        }
    }
}

/// Filters for a recipe list
#[derive(Debug, Clone)]
pub struct RecipeQuery {
    /// Who is looking and which statuses they asked for
    pub visibility: RecipeVisibility,
    /// Case-insensitive match on owner username, recipe name, or ingredient name
    pub search: Option<String>,
    /// Only recipes by this user
    pub owner: Option<UserId>,
    /// Case-insensitive substring of the recipe name
    pub recipe_name: Option<String>,
    /// Created on or after this day
    pub created_after: Option<NaiveDate>,
    /// Created on or before this day
    pub created_before: Option<NaiveDate>,
    /// Sort key
    pub ordering: RecipeOrdering,
}

impl RecipeQuery {
    /// Query with only the visibility rule applied
    #[must_use]
    pub fn visible_to(visibility: RecipeVisibility) -> Self {
        Self {
            visibility,
            search: None,
            owner: None,
            recipe_name: None,
            created_after: None,
            created_before: None,
            ordering: RecipeOrdering::default(),
        }
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(" WHERE ");
        push_sql_filter(builder, &self.visibility.sql_filter("r.owner_id", "r.status"));

        if let Some(term) = self.search.as_deref().filter(|t| !t.trim().is_empty()) {
            let pattern = contains_pattern(term.trim());
            builder.push(" AND (u.username LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(r" ESCAPE '\' OR r.recipe_name LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(
                r" ESCAPE '\' OR EXISTS (SELECT 1 FROM recipe_ingredients ri
                   JOIN ingredients i ON i.id = ri.ingredient_id
                   WHERE ri.recipe_id = r.id AND i.name LIKE ",
            );
            builder.push_bind(pattern);
            builder.push(r" ESCAPE '\'))");
        }
        if let Some(owner) = self.owner {
            builder.push(" AND r.owner_id = ");
            builder.push_bind(owner);
        }
        if let Some(name) = self.recipe_name.as_deref().filter(|n| !n.is_empty()) {
            builder.push(" AND r.recipe_name LIKE ");
            builder.push_bind(contains_pattern(name));
            builder.push(r" ESCAPE '\'");
        }
        if let Some(day) = self.created_after {
            builder.push(" AND r.created_at >= ");
            builder.push_bind(format_timestamp(day.and_time(NaiveTime::MIN).and_utc()));
        }
        if let Some(next_day) = self.created_before.and_then(|d| d.checked_add_days(Days::new(1))) {
            builder.push(" AND r.created_at < ");
            builder.push_bind(format_timestamp(next_day.and_time(NaiveTime::MIN).and_utc()));
        }
    }
}

const RECIPE_VIEW_COLUMNS: &str = r"
    SELECT r.id, r.owner_id, r.recipe_name, r.intro, r.instruction, r.image, r.status,
           r.created_at, r.updated_at,
           u.username AS owner_username,
           p.id AS profile_id,
           p.image AS profile_image,
           (SELECT COUNT(*) FROM likes l WHERE l.recipe_id = r.id) AS likes_count,
           (SELECT COUNT(*) FROM comments c WHERE c.recipe_id = r.id) AS comments_count,
           (SELECT l.id FROM likes l WHERE l.recipe_id = r.id AND l.owner_id = ";

const RECIPE_VIEW_FROM: &str = r") AS like_id
    FROM recipes r
    JOIN users u ON u.id = r.owner_id
    LEFT JOIN profiles p ON p.owner_id = r.owner_id";

/// Recipe database operations
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a recipe and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn create_recipe(&self, recipe: &Recipe) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO recipes
                (owner_id, recipe_name, intro, instruction, image, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(recipe.owner_id)
        .bind(&recipe.recipe_name)
        .bind(&recipe.intro)
        .bind(&recipe.instruction)
        .bind(&recipe.image)
        .bind(recipe.status.as_str())
        .bind(format_timestamp(recipe.created_at))
        .bind(format_timestamp(recipe.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch a recipe row by id, regardless of status
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe(&self, id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, owner_id, recipe_name, intro, instruction, image, status, created_at, updated_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.as_ref().map(Self::row_to_recipe).transpose()
    }

    /// Fetch a recipe with owner data and counts, regardless of status.
    /// Callers apply the visibility rule to the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe_view(&self, id: i64, viewer: Option<UserId>) -> AppResult<Option<RecipeView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(RECIPE_VIEW_COLUMNS);
        builder.push_bind(viewer);
        builder.push(RECIPE_VIEW_FROM);
        builder.push(" WHERE r.id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.as_ref().map(Self::row_to_recipe_view).transpose()
    }

    /// List recipes matching the query, one page at a time
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipes(
        &self,
        query: &RecipeQuery,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> AppResult<(Vec<RecipeView>, i64)> {
        let mut count_builder = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM recipes r JOIN users u ON u.id = r.owner_id",
        );
        query.push_where(&mut count_builder);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut builder = QueryBuilder::<Sqlite>::new(RECIPE_VIEW_COLUMNS);
        builder.push_bind(viewer);
        builder.push(RECIPE_VIEW_FROM);
        query.push_where(&mut builder);
        builder.push(query.ordering.order_by());
        builder.push(" LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let views = rows
            .iter()
            .map(Self::row_to_recipe_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((views, total))
    }

    /// Persist edited fields and bump `updated_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE recipes
            SET recipe_name = $1, intro = $2, instruction = $3, image = $4, status = $5, updated_at = $6
            WHERE id = $7
            ",
        )
        .bind(&recipe.recipe_name)
        .bind(&recipe.intro)
        .bind(&recipe.instruction)
        .bind(&recipe.image)
        .bind(recipe.status.as_str())
        .bind(format_timestamp(Utc::now()))
        .bind(recipe.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;
        Ok(())
    }

    /// Delete a recipe; ingredient lines, comments, and likes cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_recipe(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
        let status: String = row.get("status");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        Ok(Recipe {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            recipe_name: row.get("recipe_name"),
            intro: row.get("intro"),
            instruction: row.get("instruction"),
            image: row.get("image"),
            status: RecipeStatus::from_str(&status)
                .map_err(|e| AppError::database(format!("Invalid recipe status: {e}")))?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_recipe_view(row: &SqliteRow) -> AppResult<RecipeView> {
        Ok(RecipeView {
            recipe: Self::row_to_recipe(row)?,
            owner_username: row.get("owner_username"),
            profile_id: row.get("profile_id"),
            profile_image: row.get("profile_image"),
            likes_count: row.get("likes_count"),
            comments_count: row.get("comments_count"),
            like_id: row.get("like_id"),
        })
    }
}
