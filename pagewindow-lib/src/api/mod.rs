//! Remote paged-data collaborators
//!
//! Controllers never talk to the network directly. They are handed an
//! [`OffsetSource`] (offset/limit pages) or a [`SearchSource`] (1-based search
//! pages) at construction time, which keeps them testable with in-memory
//! doubles such as [`MemorySource`].

mod memory;
pub mod query;

pub use memory::*;
pub use query::Page;
pub use query::SearchResponse;

use async_trait::async_trait;

use crate::error::Error;

/// A source of offset-addressed pages: `GET <endpoint>?limit=L&skip=S`.
///
/// # Example
///
/// ```ignore
/// use pagewindow_lib::api::OffsetSource;
///
/// let page = source.fetch_offset(10, 20).await?;
/// println!("{} records, total {:?}", page.len(), page.total());
/// ```
#[async_trait]
pub trait OffsetSource: Send + Sync {
    /// Fetches at most `limit` records starting at record offset `skip`.
    async fn fetch_offset(&self, limit: usize, skip: usize) -> Result<Page, Error>;
}

/// A source of search result pages:
/// `GET <endpoint>?page=P&perPage=L&query=Q`.
///
/// Pages are 1-based. An empty result list means the source is exhausted.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Fetches page `page` of `per_page` results, optionally narrowed to a
    /// category query.
    async fn search(
        &self,
        page: u32,
        per_page: usize,
        query: Option<&str>,
    ) -> Result<SearchResponse, Error>;
}

#[async_trait]
impl<T: OffsetSource + ?Sized> OffsetSource for std::sync::Arc<T> {
    async fn fetch_offset(&self, limit: usize, skip: usize) -> Result<Page, Error> {
        (**self).fetch_offset(limit, skip).await
    }
}

#[async_trait]
impl<T: SearchSource + ?Sized> SearchSource for std::sync::Arc<T> {
    async fn search(
        &self,
        page: u32,
        per_page: usize,
        query: Option<&str>,
    ) -> Result<SearchResponse, Error> {
        (**self).search(page, per_page, query).await
    }
}
