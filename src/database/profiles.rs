// ABOUTME: Profile storage with recipe and follower counts derived at read time
// ABOUTME: Profiles are created with their user and only ever updated here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tasty_core::models::{Profile, ProfileCounts, UserId};
use tasty_core::pagination::PageRequest;
use tasty_core::permissions::RecipeVisibility;

use super::{format_timestamp, parse_timestamp, push_sql_filter};
use crate::errors::{AppError, AppResult};

/// Profile joined with its owner's username and derived counts
#[derive(Debug, Clone)]
pub struct ProfileView {
    /// The profile row
    pub profile: Profile,
    /// Owner username
    pub owner_username: String,
    /// Derived counts
    pub counts: ProfileCounts,
    /// The viewer's follower row for this profile's owner, if any
    pub following_id: Option<i64>,
}

/// Relationship filters for the profile list, both keyed by profile id
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileFilter {
    /// Profiles whose owner follows the owner of this profile
    pub follows_profile: Option<i64>,
    /// Profiles whose owner is followed by the owner of this profile
    pub followed_by_profile: Option<i64>,
}

/// Sort key for profile lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOrdering {
    /// By creation time
    CreatedAt {
        /// Descending when true
        descending: bool,
    },
    /// By number of owned recipes
    RecipesCount {
        /// Descending when true
        descending: bool,
    },
    /// By number of followers
    FollowersCount {
        /// Descending when true
        descending: bool,
    },
    /// By number of followed users
    FollowingCount {
        /// Descending when true
        descending: bool,
    },
}

impl Default for ProfileOrdering {
    fn default() -> Self {
        Self::CreatedAt { descending: true }
    }
}

impl FromStr for ProfileOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, field) = s
            .strip_prefix('-')
            .map_or((false, s), |field| (true, field));
        match field {
            "created_at" => Ok(Self::CreatedAt { descending }),
            "recipes_count" => Ok(Self::RecipesCount { descending }),
            "followers_count" => Ok(Self::FollowersCount { descending }),
            "following_count" => Ok(Self::FollowingCount { descending }),
            other => Err(AppError::invalid_input(format!(
                "Invalid ordering field: {other}"
            ))),
        }
    }
}

impl ProfileOrdering {
    fn order_by(self) -> String {
        let (column, descending) = match self {
            Self::CreatedAt { descending } => ("p.created_at", descending),
            Self::RecipesCount { descending } => ("recipes_count", descending),
            Self::FollowersCount { descending } => ("followers_count", descending),
            Self::FollowingCount { descending } => ("following_count", descending),
        };
        let direction = if descending { "DESC" } else { "ASC" };
        format!(" ORDER BY {column} {direction}, p.id {direction}")
    }
}

const PROFILE_VIEW_COLUMNS: &str = r"
    SELECT p.id, p.owner_id, p.name, p.content, p.image, p.created_at, p.updated_at,
           u.username AS owner_username,
           (SELECT COUNT(*) FROM recipes r WHERE r.owner_id = p.owner_id AND ";

const PROFILE_VIEW_COUNTS: &str = r") AS recipes_count,
           (SELECT COUNT(*) FROM followers f WHERE f.followed_id = p.owner_id) AS followers_count,
           (SELECT COUNT(*) FROM followers f WHERE f.owner_id = p.owner_id) AS following_count,
           (SELECT f.id FROM followers f WHERE f.followed_id = p.owner_id AND f.owner_id = ";

const PROFILE_VIEW_FROM: &str = r") AS following_id
    FROM profiles p
    JOIN users u ON u.id = p.owner_id";

/// Profile database operations
pub struct ProfilesManager {
    pool: SqlitePool,
}

impl ProfilesManager {
    /// Create a new profiles manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a profile with counts as seen by `viewer`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile_view(
        &self,
        id: i64,
        viewer: Option<UserId>,
    ) -> AppResult<Option<ProfileView>> {
        let mut builder = QueryBuilder::<Sqlite>::new("");
        Self::push_view_columns(&mut builder, viewer);
        builder.push(" WHERE p.id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.as_ref().map(Self::row_to_view).transpose()
    }

    /// Fetch the profile belonging to a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile_by_owner(&self, owner_id: UserId) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r"
            SELECT id, owner_id, name, content, image, created_at, updated_at
            FROM profiles
            WHERE owner_id = $1
            ",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    /// List profiles with counts, one page at a time
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_profiles(
        &self,
        filter: ProfileFilter,
        ordering: ProfileOrdering,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> AppResult<(Vec<ProfileView>, i64)> {
        let mut count_builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM profiles p");
        Self::push_where(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count profiles: {e}")))?;

        let mut builder = QueryBuilder::<Sqlite>::new("");
        Self::push_view_columns(&mut builder, viewer);
        Self::push_where(&mut builder, filter);
        builder.push(ordering.order_by());
        builder.push(" LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list profiles: {e}")))?;

        let views = rows
            .iter()
            .map(Self::row_to_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((views, total))
    }

    /// Persist edited display fields and bump `updated_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_profile(&self, profile: &Profile) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE profiles
            SET name = $1, content = $2, image = $3, updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(&profile.name)
        .bind(&profile.content)
        .bind(&profile.image)
        .bind(format_timestamp(Utc::now()))
        .bind(profile.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile: {e}")))?;
        Ok(())
    }

    /// Columns of [`ProfileView`]. Recipes the viewer cannot see are not counted.
    fn push_view_columns(builder: &mut QueryBuilder<'_, Sqlite>, viewer: Option<UserId>) {
        builder.push(PROFILE_VIEW_COLUMNS);
        push_sql_filter(
            builder,
            &RecipeVisibility::for_viewer(viewer).sql_filter("r.owner_id", "r.status"),
        );
        builder.push(PROFILE_VIEW_COUNTS);
        builder.push_bind(viewer);
        builder.push(PROFILE_VIEW_FROM);
    }

    fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, filter: ProfileFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(profile_id) = filter.follows_profile {
            builder.push(
                r" AND p.owner_id IN (SELECT f.owner_id FROM followers f
                   JOIN profiles target ON target.owner_id = f.followed_id
                   WHERE target.id = ",
            );
            builder.push_bind(profile_id);
            builder.push(")");
        }
        if let Some(profile_id) = filter.followed_by_profile {
            builder.push(
                r" AND p.owner_id IN (SELECT f.followed_id FROM followers f
                   JOIN profiles source ON source.owner_id = f.owner_id
                   WHERE source.id = ",
            );
            builder.push_bind(profile_id);
            builder.push(")");
        }
    }

    fn row_to_profile(row: &SqliteRow) -> AppResult<Profile> {
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        Ok(Profile {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            name: row.get("name"),
            content: row.get("content"),
            image: row.get("image"),
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_view(row: &SqliteRow) -> AppResult<ProfileView> {
        Ok(ProfileView {
            profile: Self::row_to_profile(row)?,
            owner_username: row.get("owner_username"),
            counts: ProfileCounts {
                recipes_count: row.get("recipes_count"),
                followers_count: row.get("followers_count"),
                following_count: row.get("following_count"),
            },
            following_id: row.get("following_id"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_parses_prefix() {
        assert_eq!(
            "-followers_count".parse::<ProfileOrdering>().unwrap(),
            ProfileOrdering::FollowersCount { descending: true }
        );
        assert_eq!(
            "recipes_count".parse::<ProfileOrdering>().unwrap(),
            ProfileOrdering::RecipesCount { descending: false }
        );
        assert!("owner".parse::<ProfileOrdering>().is_err());
    }

    #[test]
    fn test_default_ordering_is_newest_first() {
        assert_eq!(
            ProfileOrdering::default().order_by(),
            " ORDER BY p.created_at DESC, p.id DESC"
        );
    }
}
