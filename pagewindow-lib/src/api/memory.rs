//! In-memory data source

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;

use super::OffsetSource;
use super::Page;
use super::SearchResponse;
use super::SearchSource;
use crate::error::Error;
use crate::error::SourceError;
use crate::model::Record;

/// Field consulted when a search query narrows results to a category.
pub const CATEGORY_FIELD: &str = "category";

/// A data source backed by a fixed list of records.
///
/// Serves both offset pages and 1-based search pages from the same data.
/// Useful as a test double and for running controllers without a network.
/// Latency and failures can be injected to exercise loading states.
///
/// # Example
///
/// ```
/// use pagewindow_lib::api::MemorySource;
/// use pagewindow_lib::model::Record;
///
/// let source = MemorySource::new((1..=25).map(|i| Record::new(i).set("n", i as i64)));
/// assert_eq!(source.len(), 25);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    records: Vec<Record>,
    latency: Option<Duration>,
    failures: AtomicUsize,
    requests: AtomicUsize,
}

impl MemorySource {
    /// Creates a source serving the given records in order.
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: records.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the next `count` requests fail with [`SourceError::Unavailable`].
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Returns how many requests have been served, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Returns the number of records in the source.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    async fn begin_request(&self) -> Result<(), Error> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(SourceError::Unavailable("injected failure".into()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl OffsetSource for MemorySource {
    async fn fetch_offset(&self, limit: usize, skip: usize) -> Result<Page, Error> {
        self.begin_request().await?;

        let records = self.records.iter().skip(skip).take(limit).cloned().collect();
        Ok(Page::new(records).with_total(self.records.len()))
    }
}

#[async_trait]
impl SearchSource for MemorySource {
    async fn search(
        &self,
        page: u32,
        per_page: usize,
        query: Option<&str>,
    ) -> Result<SearchResponse, Error> {
        self.begin_request().await?;

        let matches: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| match query {
                Some(query) => record.get_str(CATEGORY_FIELD) == Some(query),
                None => true,
            })
            .collect();

        let skip = (page.max(1) as usize - 1).saturating_mul(per_page);
        let results = matches.iter().skip(skip).take(per_page).map(|r| (*r).clone()).collect();

        Ok(SearchResponse::Success {
            results,
            total: Some(matches.len()),
        })
    }
}
