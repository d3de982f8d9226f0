// ABOUTME: Recipe visibility filter shared by list queries and detail lookups
// ABOUTME: Published recipes are public; other statuses are visible to their owner only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! The same [`RecipeVisibility`] value answers two questions:
//!
//! - [`RecipeVisibility::allows`] for a recipe already in memory (detail view)
//! - [`RecipeVisibility::sql_filter`] as a `WHERE` fragment (list view)
//!
//! Both encode one rule: an explicit status filter is applied first, then
//! anything not `published` survives only if the viewer owns it.

use crate::models::{Principal, RecipeStatus, UserId};

/// Visibility rule for one principal and an optional status filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeVisibility {
    viewer: Option<UserId>,
    statuses: Vec<RecipeStatus>,
}

impl RecipeVisibility {
    /// Rule for the principal with no status filter
    #[must_use]
    pub const fn for_principal(principal: &Principal) -> Self {
        Self::for_viewer(principal.user_id())
    }

    /// Rule for a viewer known only by id; `None` is anonymous
    #[must_use]
    pub const fn for_viewer(viewer: Option<UserId>) -> Self {
        Self {
            viewer,
            statuses: Vec::new(),
        }
    }

    /// Restrict to the given statuses. An empty list means no restriction.
    #[must_use]
    pub fn with_statuses(mut self, statuses: Vec<RecipeStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Statuses explicitly requested
    #[must_use]
    pub fn statuses(&self) -> &[RecipeStatus] {
        &self.statuses
    }

    /// Whether a recipe with this owner and status is visible
    #[must_use]
    pub fn allows(&self, owner_id: UserId, status: RecipeStatus) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&status) {
            return false;
        }
        status.is_public() || self.viewer == Some(owner_id)
    }

    /// The same rule as a SQL predicate over `owner_column` and `status_column`
    #[must_use]
    pub fn sql_filter(&self, owner_column: &str, status_column: &str) -> SqlFilter {
        let mut filter = SqlFilter::default();

        filter.raw("(");
        if !self.statuses.is_empty() {
            filter.raw(format!("{status_column} IN ("));
            for (index, status) in self.statuses.iter().enumerate() {
                if index > 0 {
                    filter.raw(", ");
                }
                filter.bind(SqlValue::Text(status.as_str()));
            }
            filter.raw(") AND ");
        }

        filter.raw(format!("({status_column} = "));
        filter.bind(SqlValue::Text(RecipeStatus::Published.as_str()));
        if let Some(viewer) = self.viewer {
            filter.raw(format!(" OR {owner_column} = "));
            filter.bind(SqlValue::Integer(viewer));
        }
        filter.raw("))");

        filter
    }
}

/// Value bound into a [`SqlFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlValue {
    /// Integer parameter
    Integer(i64),
    /// Text parameter
    Text(&'static str),
}

/// One piece of a SQL fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlPart {
    /// Literal SQL text
    Raw(String),
    /// A bound parameter
    Bind(SqlValue),
}

/// SQL fragment made of literal text and bound parameters, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFilter {
    parts: Vec<SqlPart>,
}

impl SqlFilter {
    fn raw(&mut self, sql: impl Into<String>) {
        self.parts.push(SqlPart::Raw(sql.into()));
    }

    fn bind(&mut self, value: SqlValue) {
        self.parts.push(SqlPart::Bind(value));
    }

    /// Parts in the order they must be written
    #[must_use]
    pub fn parts(&self) -> &[SqlPart] {
        &self.parts
    }

    /// Render with `?` placeholders, for logging and tests
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                SqlPart::Raw(sql) => sql.as_str(),
                SqlPart::Bind(_) => "?",
            })
            .collect()
    }

    /// Bound values in placeholder order
    #[must_use]
    pub fn values(&self) -> Vec<SqlValue> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                SqlPart::Bind(value) => Some(*value),
                SqlPart::Raw(_) => None,
            })
            .collect()
    }
}
