// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # mongo-pages
//!
//! Paginated queries over any document collection: one call returns a page
//! of documents together with the total number of matches and the number of
//! pages.
//!
//! ## Features
//!
//! - **Concurrent fetch + count**: the windowed find and the count run together
//! - **Fail fast**: the first error from either read is returned unchanged
//! - **Projection, sort, populate, lean**: passed straight through to the store
//! - **Any store**: implement [`Collection`] and `paginate` comes for free
//! - **In-memory collection**: MongoDB-style filters over JSON documents
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mongo_pages::memory::MemoryCollection;
//! use mongo_pages::{PageOptions, Paginate, SortSpec};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> mongo_pages::Result<()> {
//!     let entries = MemoryCollection::new("entries");
//!     entries
//!         .insert_many((1..=100).map(|i| json!({ "title": format!("Item #{i}") })))
//!         .await?;
//!
//!     let options = PageOptions::new().page(2).limit(10).sort(SortSpec::new().desc("title"));
//!     let page = entries.paginate(&json!({}), &options).await?;
//!
//!     println!("{} of {} items, {} pages", page.len(), page.item_count, page.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!            paginate(filter, options)
//!                       │
//!          ┌────────────┴────────────┐
//!          │        try_join         │
//!   find(filter, projection,    count(filter)
//!   window, sort, populate, lean)    │
//!          └────────────┬────────────┘
//!                       │
//!   PageResult { results, item_count, page_count }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Projection, sort, populate and the find request
pub mod query;

/// The collection capability
pub mod collection;

/// Page options, results and the paginator
pub mod pagination;

/// Loading page options from JSON, YAML, files and query strings
pub mod config;

/// In-memory collection
pub mod memory;

// ============================================================================
// Re-exports
// ============================================================================

pub use collection::Collection;
pub use error::{Error, Result};
pub use pagination::{paginate, PageOptions, PageResult, Paginate, Window};
pub use query::{FindQuery, Populate, Projection, SortSpec};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
