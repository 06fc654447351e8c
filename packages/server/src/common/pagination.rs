//! Page-number list queries for the admin queues
//!
//! Every admin queue (review moderation, returns, replacements) filters by an
//! enumerated status, searches a fixed set of text fields, and pages the
//! result newest-first. They all go through [`run_list_query`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let query = params.into_query::<ReviewStatus>()?;
//! let page = run_list_query(rows, &query);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::errors::ServiceError;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on page size.
pub const MAX_PAGE_SIZE: i64 = 100;

// ============================================================================
// Status filter
// ============================================================================

/// Either the wildcard "All" or one concrete status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl<S: FromStr> FromStr for StatusFilter<S> {
    type Err = S::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        trimmed.parse().map(StatusFilter::Only)
    }
}

// ============================================================================
// Query
// ============================================================================

/// A validated list query.
#[derive(Debug, Clone)]
pub struct ListQuery<S> {
    pub status: StatusFilter<S>,
    pub search: String,
    /// 1-based; values below 1 are treated as 1.
    pub page: i64,
    /// Clamped to 1..=MAX_PAGE_SIZE.
    pub page_size: i64,
}

impl<S> Default for ListQuery<S> {
    fn default() -> Self {
        ListQuery {
            status: StatusFilter::All,
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<S> ListQuery<S> {
    pub fn new(status: StatusFilter<S>, search: impl Into<String>, page: i64, page_size: i64) -> Self {
        ListQuery {
            status,
            search: search.into(),
            page,
            page_size,
        }
    }

    pub fn effective_page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn effective_page_size(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Lowercased search needle, `None` when the search box is empty.
    fn needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }
}

/// Raw query-string parameters shared by the admin list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListParams {
    /// Parse the status filter and apply defaults.
    pub fn into_query<S: FromStr>(self) -> Result<ListQuery<S>, ServiceError> {
        let status = match self.status.as_deref() {
            None => StatusFilter::All,
            Some(raw) => raw
                .parse::<StatusFilter<S>>()
                .map_err(|_| ServiceError::validation("status", format!("unknown status '{}'", raw)))?,
        };

        Ok(ListQuery {
            status,
            search: self.search.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

// ============================================================================
// Records and pages
// ============================================================================

/// A record that can appear in an admin queue.
pub trait Listable {
    type Status: PartialEq;

    fn status(&self) -> &Self::Status;

    /// Creation/request time; the queue is ordered on this, newest first.
    fn listed_at(&self) -> DateTime<Utc>;

    /// Stable tie-breaker for records sharing a timestamp.
    fn tie_breaker(&self) -> Uuid;

    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn matches_search<T: Listable>(record: &T, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle)),
    }
}

/// Filter, sort newest-first, then slice out the requested page.
///
/// Sorting happens on the full match set so page boundaries do not move
/// between requests. A page past the end is empty, not an error.
pub fn run_list_query<T: Listable>(records: Vec<T>, query: &ListQuery<T::Status>) -> Page<T> {
    let needle = query.needle();

    let mut matched: Vec<T> = records
        .into_iter()
        .filter(|record| query.status.matches(record.status()))
        .filter(|record| matches_search(record, needle.as_deref()))
        .collect();

    matched.sort_by(|a, b| {
        b.listed_at()
            .cmp(&a.listed_at())
            .then_with(|| b.tie_breaker().cmp(&a.tie_breaker()))
    });

    let page = query.effective_page();
    let page_size = query.effective_page_size();
    let total_items = matched.len() as i64;
    let total_pages = (total_items + page_size - 1) / page_size;
    let offset = (page - 1).saturating_mul(page_size);

    let items = if offset >= total_items {
        Vec::new()
    } else {
        matched
            .into_iter()
            .skip(offset as usize)
            .take(page_size as usize)
            .collect()
    };

    Page {
        items,
        total_items,
        total_pages,
        page,
        page_size,
    }
}
