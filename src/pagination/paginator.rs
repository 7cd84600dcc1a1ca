//! Paginator
//!
//! Runs the bounded fetch and the count for one page concurrently and joins
//! them into a [`PageResult`].

use super::types::{PageOptions, PageResult};
use crate::collection::Collection;
use async_trait::async_trait;
use futures::future::try_join;
use tracing::debug;

/// Fetch one page of `collection` matching `filter`
///
/// Issues exactly two reads: the windowed find built from `options` and a
/// count over `filter` alone. Both are dispatched together and awaited
/// jointly. The first error from either read is returned as-is and the other
/// read is dropped.
pub async fn paginate<C>(
    collection: &C,
    filter: &C::Filter,
    options: &PageOptions,
) -> Result<PageResult<C::Document>, C::Error>
where
    C: Collection + ?Sized,
{
    let window = options.window();
    debug!(
        "Paginating {}: page {} (skip {}, limit {})",
        collection.name(),
        options.effective_page(),
        window.skip,
        window.limit
    );

    let query = options.find_query(filter);
    let (results, item_count) = try_join(collection.find(query), collection.count(filter)).await?;

    let page = PageResult::new(results, item_count, window);
    debug!(
        "Paginated {}: {} results, {} items, {} pages",
        collection.name(),
        page.len(),
        page.item_count,
        page.page_count
    );

    Ok(page)
}

/// Pagination for any [`Collection`]
///
/// Blanket-implemented, so `collection.paginate(..)` is available on every
/// collection type without further code.
#[async_trait]
pub trait Paginate: Collection {
    /// Fetch one page; see [`paginate`]
    async fn paginate(
        &self,
        filter: &Self::Filter,
        options: &PageOptions,
    ) -> Result<PageResult<Self::Document>, Self::Error> {
        crate::pagination::paginate(self, filter, options).await
    }

    /// Fetch one page and hand the outcome to `callback`
    ///
    /// `callback` runs exactly once, with either the page or the error.
    /// Absent options take their defaults.
    async fn paginate_with<F>(
        &self,
        filter: &Self::Filter,
        options: Option<&PageOptions>,
        callback: F,
    ) where
        F: FnOnce(Result<PageResult<Self::Document>, Self::Error>) + Send,
    {
        let defaults = PageOptions::default();
        let options = options.unwrap_or(&defaults);
        callback(crate::pagination::paginate(self, filter, options).await);
    }
}

impl<C> Paginate for C where C: Collection + ?Sized {}
