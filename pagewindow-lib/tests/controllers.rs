//! End-to-end behavior of the load controllers and the sort toggler,
//! driven through async sources.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::LevelFilter;
use pagewindow_lib::api::MemorySource;
use pagewindow_lib::api::OffsetSource;
use pagewindow_lib::api::Page;
use pagewindow_lib::api::SearchResponse;
use pagewindow_lib::api::SearchSource;
use pagewindow_lib::config::WindowConfig;
use pagewindow_lib::controller::AppendController;
use pagewindow_lib::controller::Completion;
use pagewindow_lib::controller::PageRequest;
use pagewindow_lib::controller::ReplaceController;
use pagewindow_lib::error::Error;
use pagewindow_lib::model::Record;
use pagewindow_lib::model::RecordId;
use pagewindow_lib::sentinel::RecordingSentinel;
use pagewindow_lib::sentinel::ViewportSentinel;
use pagewindow_lib::sort::Column;
use pagewindow_lib::sort::ColumnKind;
use pagewindow_lib::sort::SortDirection;
use simplelog::Config;
use simplelog::TestLogger;

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn records(n: i64) -> Vec<Record> {
    (1..=n).map(|i| Record::new(i).set("n", (i * 7) % 11)).collect()
}

fn list_config() -> WindowConfig {
    WindowConfig::without_categories().with_per_page(4)
}

fn ids(records: &[Record]) -> Vec<RecordId> {
    records.iter().map(|r| r.id().clone()).collect()
}

/// A search source whose requests never finish.
struct HungSource;

#[async_trait]
impl SearchSource for HungSource {
    async fn search(&self, _: u32, _: usize, _: Option<&str>) -> Result<SearchResponse, Error> {
        futures::future::pending().await
    }
}

/// An offset source where page 0 answers after every other page.
struct SlowFirstPage(MemorySource);

#[async_trait]
impl OffsetSource for SlowFirstPage {
    async fn fetch_offset(&self, limit: usize, skip: usize) -> Result<Page, Error> {
        let delay = if skip == 0 { 60 } else { 5 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.0.fetch_offset(limit, skip).await
    }
}

// =============================================================================
// Growing list
// =============================================================================

mod append {
    use super::*;

    #[tokio::test]
    async fn test_window_only_grows() {
        init_logging();
        let source = MemorySource::new(records(10));
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());

        list.start(&source).await;
        let mut last_len = list.items().len();
        assert_eq!(last_len, 4);

        for _ in 0..6 {
            list.load_more(&source).await;
            assert!(list.items().len() >= last_len, "window must never shrink");
            last_len = list.items().len();
        }

        assert_eq!(last_len, 10);
        assert!(!list.has_more());
        assert!(list.show_end_banner());
    }

    #[tokio::test]
    async fn test_exhaustion_is_permanent() {
        init_logging();
        let source = MemorySource::new(records(4));
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());

        list.start(&source).await;
        assert_eq!(list.load_more(&source).await, Some(Completion::Exhausted));
        let requests = source.requests();

        for _ in 0..5 {
            assert_eq!(list.load_more(&source).await, None);
            assert!(list.on_crossing(&RecordId::Int(4), true).is_none());
        }
        assert_eq!(source.requests(), requests, "no fetch after exhaustion");
        assert!(!list.has_more());
    }

    #[tokio::test]
    async fn test_failure_stops_loading_and_clears_flag() {
        init_logging();
        let source = MemorySource::new(records(12));
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());

        list.start(&source).await;
        source.fail_next(1);

        assert_eq!(list.load_more(&source).await, Some(Completion::Failed));
        assert!(!list.is_loading());
        assert!(!list.has_more());
        assert_eq!(list.items().len(), 4);
        assert_eq!(list.load_more(&source).await, None);
    }

    #[tokio::test]
    async fn test_crossing_during_fetch_is_ignored() {
        init_logging();
        let source = MemorySource::new(records(12));
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());
        list.start(&source).await;

        let request = list.on_crossing(&RecordId::Int(4), true).unwrap();
        let cursor = list.cursor();

        // The sentinel keeps firing while the fetch is outstanding.
        for _ in 0..3 {
            assert!(list.on_crossing(&RecordId::Int(4), true).is_none());
        }
        assert_eq!(list.cursor(), cursor);

        let result = request.send(&source).await;
        assert_eq!(list.complete(&request, result), Completion::Applied { added: 4 });
        assert_eq!(list.items().len(), 8);
    }

    #[tokio::test]
    async fn test_sentinel_follows_last_row() {
        init_logging();
        let source = MemorySource::new(records(10));
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());

        list.start(&source).await;
        assert_eq!(list.sentinel().observed(), vec![RecordId::Int(4)]);

        list.load_more(&source).await;
        assert_eq!(list.sentinel().observed(), vec![RecordId::Int(8)]);

        list.load_more(&source).await;
        assert_eq!(list.sentinel().observed(), vec![RecordId::Int(10)]);
        assert_eq!(list.sentinel().observe_calls(), 3);

        // A crossing for a row that is no longer observed does nothing.
        list.reset();
        assert!(list.on_crossing(&RecordId::Int(8), true).is_none());
    }

    #[tokio::test]
    async fn test_hung_fetch_keeps_loading() {
        init_logging();
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());
        let request = list.mount().unwrap();

        let outcome = tokio::time::timeout(Duration::from_millis(20), list.run(request, &HungSource)).await;

        assert!(outcome.is_err(), "fetch should still be pending");
        assert!(list.is_loading());
        assert!(list.on_sentinel_visible().is_none());
    }

    #[tokio::test]
    async fn test_unmount_ignores_late_fetch() {
        init_logging();
        let source = MemorySource::new(records(10)).with_latency(Duration::from_millis(5));
        let mut list = AppendController::new(list_config(), RecordingSentinel::new());

        let request = list.mount().unwrap();
        list.unmount();

        let result = request.send(&source).await;
        assert_eq!(list.complete(&request, result), Completion::Stale);
        assert!(list.items().is_empty());
        assert!(list.sentinel().observed().is_empty());
    }

    #[tokio::test]
    async fn test_viewport_scrolling_loads_everything() {
        init_logging();
        let source = Arc::new(MemorySource::new(records(18)));
        let mut list = AppendController::new(list_config(), ViewportSentinel::new(3));
        list.start(&source).await;

        let mut offset = 0;
        while list.has_more() {
            let target = list.sentinel_target().cloned().unwrap();
            let row = list.items().len() - 1;
            list.sentinel_mut().place(&target, row);
            list.sentinel_mut().scroll_to(offset);
            offset += 1;

            let (target, visible) = list.sentinel().crossing().unwrap();
            if let Some(request) = list.on_crossing(&target, visible) {
                list.run(request, &source).await;
            }
        }

        assert_eq!(list.items().len(), 18);
        assert_eq!(source.requests(), 6);
    }
}

// =============================================================================
// Paged table
// =============================================================================

mod replace {
    use super::*;

    #[tokio::test]
    async fn test_navigation_replaces_window() {
        init_logging();
        let source = MemorySource::new(records(30));
        let mut table = ReplaceController::new(WindowConfig::default());

        table.start(&source).await;
        assert_eq!(table.items().first().map(|r| r.id().clone()), Some(RecordId::Int(1)));

        let request = table.next().unwrap();
        assert!(table.items().is_empty(), "window clears as soon as the page changes");
        table.run(request, &source).await;

        assert_eq!(table.items().len(), 10);
        assert_eq!(table.items().first().map(|r| r.id().clone()), Some(RecordId::Int(11)));
    }

    #[tokio::test]
    async fn test_cursor_stays_in_bounds() {
        init_logging();
        let mut table = ReplaceController::new(WindowConfig::default());
        table.mount();

        for input in ["-100", "-1", "3", "26", "1000", "  12 ", "1.5", "inf", "-inf"] {
            table.jump_to(input);
            assert!(table.cursor() <= 25, "cursor {} out of bounds after {:?}", table.cursor(), input);
        }

        table.set_cursor(9);
        table.jump_to("0");
        assert_eq!(table.cursor(), 9);

        table.set_cursor(0);
        table.prev();
        assert_eq!(table.cursor(), 0);

        table.set_cursor(25);
        table.next();
        assert_eq!(table.cursor(), 25);
    }

    #[tokio::test]
    async fn test_out_of_order_responses() {
        init_logging();
        let source = SlowFirstPage(MemorySource::new(records(30)));
        let mut table = ReplaceController::new(WindowConfig::default());

        let first = table.mount().unwrap();
        let second = table.next().unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<(PageRequest, Result<Page, Error>)>();
        let send = |request: PageRequest| {
            let tx = tx.clone();
            let source = &source;
            async move {
                let result = request.send(source).await;
                let _ = tx.send((request, result));
            }
        };
        futures::future::join(send(first), send(second)).await;
        drop(tx);

        let mut outcomes = Vec::new();
        while let Some((request, result)) = rx.recv().await {
            outcomes.push((request.cursor, table.complete(&request, result)));
        }

        assert_eq!(
            outcomes,
            vec![
                (1, Completion::Applied { added: 10 }),
                (0, Completion::Stale),
            ]
        );
        assert_eq!(table.cursor(), 1);
        assert_eq!(table.items().first().map(|r| r.id().clone()), Some(RecordId::Int(11)));
    }

    #[tokio::test]
    async fn test_failed_page_stays_empty() {
        init_logging();
        let source = MemorySource::new(records(30));
        let mut table = ReplaceController::new(WindowConfig::default());
        table.start(&source).await;

        source.fail_next(1);
        let request = table.next().unwrap();
        assert_eq!(table.run(request, &source).await, Completion::Failed);
        assert!(table.items().is_empty());
        assert!(!table.is_loading());

        let request = table.next().unwrap();
        assert_eq!(table.run(request, &source).await, Completion::Applied { added: 10 });
        assert_eq!(table.last_error(), None);
    }
}

// =============================================================================
// Sorting the table window
// =============================================================================

mod sort {
    use super::*;

    fn window_source() -> MemorySource {
        MemorySource::new([
            Record::new(1).set("n", 3i64),
            Record::new(2).set("n", 1i64),
            Record::new(3).set("n", 2i64),
        ])
    }

    #[tokio::test]
    async fn test_click_sorts_then_reverses() {
        init_logging();
        let source = window_source();
        let n = Column::new("n", "N", ColumnKind::Number);
        let mut table = ReplaceController::new(WindowConfig::default());
        table.start(&source).await;

        assert_eq!(table.on_column_header_click(&n), Some(SortDirection::Ascending));
        assert_eq!(
            ids(table.items()),
            vec![RecordId::Int(2), RecordId::Int(3), RecordId::Int(1)]
        );

        assert_eq!(table.on_column_header_click(&n), Some(SortDirection::Descending));
        assert_eq!(
            ids(table.items()),
            vec![RecordId::Int(1), RecordId::Int(3), RecordId::Int(2)]
        );
    }

    #[tokio::test]
    async fn test_page_change_discards_sort() {
        init_logging();
        let source = MemorySource::new(records(20));
        let n = Column::new("n", "N", ColumnKind::Number);
        let mut table = ReplaceController::new(WindowConfig::default());
        table.start(&source).await;

        table.on_column_header_click(&n);
        table.on_column_header_click(&n);
        assert_eq!(table.sort_direction("n"), Some(SortDirection::Descending));

        let request = table.next().unwrap();
        assert!(table.items().is_empty());
        table.run(request, &source).await;
        assert_eq!(table.sort_direction("n"), None);

        assert_eq!(table.on_column_header_click(&n), Some(SortDirection::Ascending));
        let values: Vec<i64> = table.items().iter().filter_map(|r| r.get_i64("n")).collect();
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(values, sorted);
    }
}
