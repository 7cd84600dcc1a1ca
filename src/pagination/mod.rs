//! Pagination module
//!
//! Computes one page of a filtered collection together with the total
//! matching count and the derived page count.
//!
//! # Overview
//!
//! - `PageOptions` - page, limit, projection, sort, populate and lean mode
//! - `Window` - the resolved `(skip, limit)` pair
//! - `PageResult` - the page plus `item_count` and `page_count`
//! - `paginate` / `Paginate` - concurrent fetch + count against a `Collection`

mod paginator;
mod types;

pub use paginator::{paginate, Paginate};
pub use types::{PageOptions, PageResult, Window, DEFAULT_LIMIT, DEFAULT_PAGE};

#[cfg(test)]
mod tests;
