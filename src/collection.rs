//! Collection capability
//!
//! Defines the `Collection` trait the paginator reads through. Any store
//! that can execute a bounded find and a count over the same filter can be
//! paginated; the trait says nothing about how documents are stored.

use crate::query::FindQuery;
use async_trait::async_trait;

/// A queryable document collection
///
/// Implementors own the meaning of `Filter`, the shape of `Document` and the
/// error channel. Both methods are reads; the paginator issues them
/// concurrently against a shared reference, so implementations must be safe
/// to call in parallel.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Predicate type understood by this store
    type Filter: Send + Sync;

    /// Document type returned by `find`
    type Document: Send;

    /// Error reported by either read
    type Error: Send;

    /// Collection name, used for logging
    fn name(&self) -> &str;

    /// Execute a bounded find and return the matching documents in order
    async fn find(
        &self,
        query: FindQuery<'_, Self::Filter>,
    ) -> Result<Vec<Self::Document>, Self::Error>;

    /// Count all documents matching `filter`
    async fn count(&self, filter: &Self::Filter) -> Result<u64, Self::Error>;
}

#[async_trait]
impl<C> Collection for std::sync::Arc<C>
where
    C: Collection + ?Sized,
{
    type Filter = C::Filter;
    type Document = C::Document;
    type Error = C::Error;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn find(
        &self,
        query: FindQuery<'_, Self::Filter>,
    ) -> Result<Vec<Self::Document>, Self::Error> {
        (**self).find(query).await
    }

    async fn count(&self, filter: &Self::Filter) -> Result<u64, Self::Error> {
        (**self).count(filter).await
    }
}
