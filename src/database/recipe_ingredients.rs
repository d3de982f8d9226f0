// ABOUTME: Recipe ingredient lines plus get-or-create resolution of shared ingredient and measurement names
// ABOUTME: Names resolve by exact match; the unique constraint settles concurrent creates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tasty_core::models::{
    Ingredient, IngredientName, Measurement, MeasurementName, RecipeIngredient, RecipeStatus,
};
use tasty_core::pagination::PageRequest;
use tasty_core::permissions::RecipeVisibility;

use super::{contains_pattern, push_sql_filter, TransactionGuard};
use crate::errors::{AppError, AppResult};

/// Filters for the ingredient line list
#[derive(Debug, Clone, Default)]
pub struct RecipeIngredientFilter {
    /// Lines of this recipe only
    pub recipe: Option<i64>,
    /// Case-insensitive substring of the recipe name
    pub recipe_name: Option<String>,
    /// Exact ingredient name
    pub ingredient: Option<String>,
}

const LINE_COLUMNS: &str = r"
    SELECT ri.id, ri.recipe_id, r.owner_id AS recipe_owner_id, r.status AS recipe_status,
           i.name AS ingredient, ri.quantity, m.measure AS measure
    FROM recipe_ingredients ri
    JOIN recipes r ON r.id = ri.recipe_id
    JOIN ingredients i ON i.id = ri.ingredient_id
    JOIN measurements m ON m.id = ri.measurement_id";

/// Recipe ingredient database operations
pub struct RecipeIngredientsManager {
    pool: SqlitePool,
}

impl RecipeIngredientsManager {
    /// Create a new recipe ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve an ingredient name to its shared row, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn resolve_ingredient(
        conn: &mut SqliteConnection,
        name: &IngredientName,
    ) -> AppResult<i64> {
        sqlx::query("INSERT INTO ingredients (name) VALUES ($1) ON CONFLICT(name) DO NOTHING")
            .bind(name.as_str())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;

        sqlx::query_scalar("SELECT id FROM ingredients WHERE name = $1")
            .bind(name.as_str())
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve ingredient: {e}")))
    }

    /// Resolve a measurement name to its shared row, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn resolve_measurement(
        conn: &mut SqliteConnection,
        measure: &MeasurementName,
    ) -> AppResult<i64> {
        sqlx::query("INSERT INTO measurements (measure) VALUES ($1) ON CONFLICT(measure) DO NOTHING")
            .bind(measure.as_str())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to create measurement: {e}")))?;

        sqlx::query_scalar("SELECT id FROM measurements WHERE measure = $1")
            .bind(measure.as_str())
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve measurement: {e}")))
    }

    /// Insert a line, resolving both names in the same transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn create_recipe_ingredient(
        &self,
        recipe_id: i64,
        ingredient: &IngredientName,
        quantity: &str,
        measure: &MeasurementName,
    ) -> AppResult<i64> {
        let mut guard = TransactionGuard::begin(&self.pool).await?;
        let ingredient_id = Self::resolve_ingredient(guard.executor()?, ingredient).await?;
        let measurement_id = Self::resolve_measurement(guard.executor()?, measure).await?;

        let id = sqlx::query(
            r"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, measurement_id)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(quantity)
        .bind(measurement_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe ingredient: {e}")))?
        .last_insert_rowid();

        guard.commit().await?;
        Ok(id)
    }

    /// Replace every field of a line
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_recipe_ingredient(
        &self,
        id: i64,
        recipe_id: i64,
        ingredient: &IngredientName,
        quantity: &str,
        measure: &MeasurementName,
    ) -> AppResult<()> {
        let mut guard = TransactionGuard::begin(&self.pool).await?;
        let ingredient_id = Self::resolve_ingredient(guard.executor()?, ingredient).await?;
        let measurement_id = Self::resolve_measurement(guard.executor()?, measure).await?;

        sqlx::query(
            r"
            UPDATE recipe_ingredients
            SET recipe_id = $1, ingredient_id = $2, quantity = $3, measurement_id = $4
            WHERE id = $5
            ",
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(quantity)
        .bind(measurement_id)
        .bind(id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe ingredient: {e}")))?;

        guard.commit().await
    }

    /// Fetch a line together with its recipe's status
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe_ingredient(
        &self,
        id: i64,
    ) -> AppResult<Option<(RecipeIngredient, RecipeStatus)>> {
        let mut builder = QueryBuilder::<Sqlite>::new(LINE_COLUMNS);
        builder.push(" WHERE ri.id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe ingredient: {e}")))?;

        row.as_ref()
            .map(|row| -> AppResult<_> { Ok((Self::row_to_line(row), Self::row_to_status(row)?)) })
            .transpose()
    }

    /// List lines of recipes visible under `visibility`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipe_ingredients(
        &self,
        filter: &RecipeIngredientFilter,
        visibility: &RecipeVisibility,
        page: PageRequest,
    ) -> AppResult<(Vec<RecipeIngredient>, i64)> {
        let mut count_builder = QueryBuilder::<Sqlite>::new(
            r"SELECT COUNT(*)
              FROM recipe_ingredients ri
              JOIN recipes r ON r.id = ri.recipe_id
              JOIN ingredients i ON i.id = ri.ingredient_id",
        );
        Self::push_where(&mut count_builder, filter, visibility);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipe ingredients: {e}")))?;

        let mut builder = QueryBuilder::<Sqlite>::new(LINE_COLUMNS);
        Self::push_where(&mut builder, filter, visibility);
        builder.push(" ORDER BY ri.id ASC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipe ingredients: {e}")))?;

        Ok((rows.iter().map(Self::row_to_line).collect(), total))
    }

    /// All lines of the given recipes, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_for_recipes(&self, recipe_ids: &[i64]) -> AppResult<Vec<RecipeIngredient>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(LINE_COLUMNS);
        builder.push(" WHERE ri.recipe_id IN (");
        let mut separated = builder.separated(", ");
        for id in recipe_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY ri.id ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipe ingredients: {e}")))?;

        Ok(rows.iter().map(Self::row_to_line).collect())
    }

    /// Delete a line
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_recipe_ingredient(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipe_ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe ingredient: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Shared ingredient names, alphabetically
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query("SELECT id, name FROM ingredients ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| Ingredient {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Shared measurement names, alphabetically
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_measurements(&self) -> AppResult<Vec<Measurement>> {
        let rows = sqlx::query("SELECT id, measure FROM measurements ORDER BY measure ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list measurements: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| Measurement {
                id: row.get("id"),
                measure: row.get("measure"),
            })
            .collect())
    }

    fn push_where(
        builder: &mut QueryBuilder<'_, Sqlite>,
        filter: &RecipeIngredientFilter,
        visibility: &RecipeVisibility,
    ) {
        builder.push(" WHERE ");
        push_sql_filter(builder, &visibility.sql_filter("r.owner_id", "r.status"));

        if let Some(recipe_id) = filter.recipe {
            builder.push(" AND ri.recipe_id = ");
            builder.push_bind(recipe_id);
        }
        if let Some(name) = filter.recipe_name.as_deref().filter(|n| !n.is_empty()) {
            builder.push(" AND r.recipe_name LIKE ");
            builder.push_bind(contains_pattern(name));
            builder.push(r" ESCAPE '\'");
        }
        if let Some(ingredient) = filter.ingredient.clone() {
            builder.push(" AND i.name = ");
            builder.push_bind(ingredient);
        }
    }

    fn row_to_line(row: &SqliteRow) -> RecipeIngredient {
        RecipeIngredient {
            id: row.get("id"),
            recipe_id: row.get("recipe_id"),
            recipe_owner_id: row.get("recipe_owner_id"),
            ingredient: row.get("ingredient"),
            quantity: row.get("quantity"),
            measure: row.get("measure"),
        }
    }

    fn row_to_status(row: &SqliteRow) -> AppResult<RecipeStatus> {
        let status: String = row.get("recipe_status");
        RecipeStatus::from_str(&status)
            .map_err(|e| AppError::database(format!("Invalid recipe status: {e}")))
    }
}
