// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Parses page/limit query values and builds count/next/previous envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use serde::{Deserialize, Serialize};

use crate::constants::pagination::MAX_PAGE_SIZE;
use crate::errors::{AppError, AppResult};

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number starting at 1
    pub page: u32,
    /// Items per page, capped at [`MAX_PAGE_SIZE`]
    pub limit: u32,
}

impl PageRequest {
    /// Build a page request from raw query values
    ///
    /// # Errors
    ///
    /// Returns an error if `page` or `limit` is not a positive integer
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> AppResult<Self> {
        let page = match page {
            Some(raw) => parse_positive(raw, "page")?,
            None => 1,
        };
        let limit = match limit {
            Some(raw) => parse_positive(raw, "limit")?,
            None => default_limit,
        };

        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    /// Row offset for SQL `OFFSET`
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

fn parse_positive(raw: &str, field: &str) -> AppResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(
            AppError::invalid_input(format!("'{field}' must be a positive integer"))
                .with_field(field),
        ),
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: u64,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap one page of results
    ///
    /// `path` is the request path the links point at, `extra` holds the
    /// remaining query parameters to carry over.
    #[must_use]
    pub fn new(
        results: Vec<T>,
        count: u64,
        request: &PageRequest,
        path: &str,
        extra: &[(&str, String)],
    ) -> Self {
        let shown = u64::from(request.page) * u64::from(request.limit);
        let next = (shown < count).then(|| page_link(path, request.page + 1, request.limit, extra));
        let previous =
            (request.page > 1).then(|| page_link(path, request.page - 1, request.limit, extra));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn page_link(path: &str, page: u32, limit: u32, extra: &[(&str, String)]) -> String {
    let mut query = format!("page={page}&limit={limit}");
    for (key, value) in extra {
        query.push('&');
        query.push_str(&urlencoding::encode(key));
        query.push('=');
        query.push_str(&urlencoding::encode(value));
    }
    format!("{path}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_cap() {
        let request = PageRequest::from_params(None, None, 6).unwrap();
        assert_eq!(request, PageRequest { page: 1, limit: 6 });

        let capped = PageRequest::from_params(Some("2"), Some("1000"), 6).unwrap();
        assert_eq!(capped.limit, MAX_PAGE_SIZE);
        assert_eq!(capped.offset(), i64::from(MAX_PAGE_SIZE));
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        assert!(PageRequest::from_params(Some("0"), None, 6).is_err());
        let error = PageRequest::from_params(None, Some("lots"), 6).unwrap_err();
        assert_eq!(error.context.field.as_deref(), Some("limit"));
    }

    #[test]
    fn test_links_carry_filters() {
        let request = PageRequest { page: 2, limit: 2 };
        let page = Page::new(
            vec![3, 4],
            5,
            &request,
            "/api/recipes/",
            &[("name", "Tomato soup".to_owned())],
        );

        assert_eq!(
            page.next.as_deref(),
            Some("/api/recipes/?page=3&limit=2&name=Tomato%20soup")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/recipes/?page=1&limit=2&name=Tomato%20soup")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let request = PageRequest { page: 1, limit: 6 };
        let page = Page::new(vec!["a"], 1, &request, "/api/users/", &[]);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }
}
