//! In-memory collection module
//!
//! A reference `Collection` backed by a `Vec` of JSON documents. Useful for
//! tests, prototypes and small embedded data sets.
//!
//! # Overview
//!
//! - `MemoryCollection` - shared handle implementing `Collection`
//! - `Document` - a stored document with its metadata
//! - `Record` - what `find` returns: a hydrated `Document` or lean data
//!
//! Filters are MongoDB-style JSON (`{"title": {"$gte": "Item #5"}}`).

mod collection;
mod document;
mod filter;

pub use collection::MemoryCollection;
pub use document::{Document, Record, ID_FIELD};
