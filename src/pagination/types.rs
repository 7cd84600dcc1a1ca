//! Pagination types
//!
//! Page options, the resolved window and the page result.

use crate::query::{FindQuery, Populate, Projection, SortSpec};
use serde::{Deserialize, Serialize};

/// Page used when none is given
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none is given
pub const DEFAULT_LIMIT: u64 = 10;

// ============================================================================
// Page Options
// ============================================================================

/// Options for a single `paginate` call
///
/// Every field is optional. `page` and `limit` fall back to
/// [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`] when absent or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// 1-based page index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    /// Maximum documents per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Projection applied to the fetched documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Projection>,

    /// Ordering of the fetched documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,

    /// Reference fields to resolve
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate: Option<Populate>,

    /// Return plain records instead of store wrappers
    pub lean: bool,
}

impl PageOptions {
    /// Create options with every field defaulted
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page
    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the projection
    #[must_use]
    pub fn columns(mut self, columns: Projection) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set the sort
    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the fields to populate
    #[must_use]
    pub fn populate(mut self, populate: impl Into<Populate>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    /// Enable or disable lean mode
    #[must_use]
    pub fn lean(mut self, lean: bool) -> Self {
        self.lean = lean;
        self
    }

    /// Effective page after defaulting
    pub fn effective_page(&self) -> u64 {
        self.page.filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE)
    }

    /// Effective page size after defaulting
    pub fn effective_limit(&self) -> u64 {
        self.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    /// Resolve the `(skip, limit)` window for these options
    pub fn window(&self) -> Window {
        Window::new(self.effective_page(), self.effective_limit())
    }

    /// Build the bounded-fetch request for `filter`
    pub fn find_query<'a, F>(&self, filter: &'a F) -> FindQuery<'a, F> {
        let window = self.window();
        let mut query = FindQuery::new(filter);

        if let Some(columns) = &self.columns {
            query = query.select(columns.clone());
        }
        query = query.skip(window.skip).limit(window.limit);
        if let Some(sort) = &self.sort {
            query = query.sort(sort.clone());
        }
        if let Some(populate) = &self.populate {
            for field in populate.fields() {
                query = query.populate(field);
            }
        }
        query.lean(self.lean)
    }
}

// ============================================================================
// Window
// ============================================================================

/// Resolved `(skip, limit)` pair restricting a result set to one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Documents skipped before the page starts
    pub skip: u64,
    /// Maximum documents in the page (never zero)
    pub limit: u64,
}

impl Window {
    /// Compute the window for a 1-based `page` of `limit` documents
    ///
    /// Page `0` is treated as page 1 and a zero limit as [`DEFAULT_LIMIT`],
    /// so `skip` is never negative. Large pages saturate instead of
    /// overflowing.
    pub fn new(page: u64, limit: u64) -> Self {
        let page = page.max(1);
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        Self {
            skip: (page - 1).saturating_mul(limit),
            limit,
        }
    }

    /// Number of pages needed for `item_count` documents (at least one)
    pub fn page_count(&self, item_count: u64) -> u64 {
        item_count.div_ceil(self.limit).max(1)
    }
}

// ============================================================================
// Page Result
// ============================================================================

/// One page of documents plus the totals for the filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<D> {
    /// Documents in this page, at most `limit`
    pub results: Vec<D>,
    /// Total documents matching the filter
    pub item_count: u64,
    /// `max(1, ceil(item_count / limit))`
    pub page_count: u64,
}

impl<D> PageResult<D> {
    /// Assemble a page from fetched documents and the filter's total count
    pub fn new(results: Vec<D>, item_count: u64, window: Window) -> Self {
        Self {
            results,
            item_count,
            page_count: window.page_count(item_count),
        }
    }

    /// Number of documents in this page
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if this page holds no documents
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Check if a page follows `page`
    pub fn has_next_page(&self, page: u64) -> bool {
        page < self.page_count
    }

    /// Convert every document, keeping the totals
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(D) -> U,
    {
        PageResult {
            results: self.results.into_iter().map(f).collect(),
            item_count: self.item_count,
            page_count: self.page_count,
        }
    }

    /// Take the documents, dropping the totals
    pub fn into_results(self) -> Vec<D> {
        self.results
    }
}
