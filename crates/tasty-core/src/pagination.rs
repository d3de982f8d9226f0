// ABOUTME: Page-number pagination with count/next/previous envelopes
// ABOUTME: Converts page and page_size query parameters into LIMIT/OFFSET
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use serde::{Deserialize, Serialize};

use crate::constants::pagination::DEFAULT_PAGE_SIZE;
use crate::errors::{AppError, AppResult};

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number starting at 1
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from optional query values, clamping the page size to `max_page_size`
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when `page` or `page_size` is zero
    pub fn from_query(
        page: Option<u32>,
        page_size: Option<u32>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::invalid_input("page must be 1 or greater"));
        }
        let page_size = page_size.unwrap_or(default_page_size);
        if page_size == 0 {
            return Err(AppError::invalid_input("page_size must be 1 or greater"));
        }
        Ok(Self {
            page,
            page_size: page_size.min(max_page_size.max(1)),
        })
    }

    /// SQL LIMIT
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// SQL OFFSET
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages
    pub count: i64,
    /// Next page number, if any
    pub next: Option<u32>,
    /// Previous page number, if any
    pub previous: Option<u32>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap a page of results
    ///
    /// # Errors
    ///
    /// Returns not found when a page past the last one is requested
    pub fn new(results: Vec<T>, count: i64, request: PageRequest) -> AppResult<Self> {
        let page_size = i64::from(request.page_size);
        let last_page = if count == 0 {
            1
        } else {
            (count + page_size - 1) / page_size
        };
        if i64::from(request.page) > last_page {
            return Err(AppError::not_found("Page"));
        }
        Ok(Self {
            count,
            next: (i64::from(request.page) < last_page).then_some(request.page + 1),
            previous: (request.page > 1).then(|| request.page - 1),
            results,
        })
    }

    /// Convert each item, keeping the envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
