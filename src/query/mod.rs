//! Query module
//!
//! Store-agnostic descriptions of what a bounded fetch asks for.
//!
//! # Overview
//!
//! - `Projection` - which fields to return
//! - `SortSpec` - ordering of the fetch
//! - `Populate` - reference fields to dereference
//! - `FindQuery` - the chainable request a collection executes

mod types;

pub use types::{FindQuery, Populate, Projection, SortKey, SortSpec};

#[cfg(test)]
mod tests;
