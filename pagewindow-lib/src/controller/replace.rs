//! Paged table driven by explicit navigation.

use crate::api::OffsetSource;
use crate::api::Page;
use crate::config::WindowConfig;
use crate::error::Error;
use crate::model::Record;
use crate::sort::Column;
use crate::sort::SortDirection;
use crate::sort::SortToggler;

use super::Completion;
use super::RequestTracker;

/// An offset page requested by a [`ReplaceController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Sequence number matched on completion.
    pub seq: u64,
    /// Page index the request was issued for.
    pub cursor: u32,
    /// Records per page.
    pub limit: usize,
    /// Record offset, `cursor * limit`.
    pub skip: usize,
}

impl PageRequest {
    /// Runs the request against `source`.
    pub async fn send<S>(&self, source: &S) -> Result<Page, Error>
    where
        S: OffsetSource + ?Sized,
    {
        source.fetch_offset(self.limit, self.skip).await
    }
}

/// Parses free-text page input.
///
/// Returns `None` for "no change": blank input, `0`, and anything that is not
/// a number. Fractions are truncated; out-of-range values are returned as-is
/// for the controller to clamp.
///
/// # Example
///
/// ```
/// use pagewindow_lib::controller::parse_page_input;
///
/// assert_eq!(parse_page_input("7"), Some(7));
/// assert_eq!(parse_page_input(" 40 "), Some(40));
/// assert_eq!(parse_page_input("-3"), Some(-3));
/// assert_eq!(parse_page_input("0"), None);
/// assert_eq!(parse_page_input(""), None);
/// assert_eq!(parse_page_input("abc"), None);
/// ```
pub fn parse_page_input(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: f64 = trimmed.parse().ok()?;
    if value.is_nan() || value == 0.0 {
        return None;
    }

    // Saturating cast keeps +-inf at the i64 bounds.
    Some(value.trunc() as i64)
}

/// Controller for a paginated table.
///
/// The cursor is a page index clamped to `[0, max_page]`. Every cursor change
/// empties the window and fetches exactly one page at offset
/// `cursor * page_size`, which then replaces the window. There is no
/// "has more" signal: `max_page` is the only bound.
///
/// Each replacement starts a new window generation. Column sort state is
/// scoped to the generation, so a header click after navigating always
/// starts with an ascending sort.
///
/// # Example
///
/// ```ignore
/// use pagewindow_lib::controller::ReplaceController;
///
/// let mut table = ReplaceController::new(WindowConfig::default());
/// table.start(&client).await;
///
/// if let Some(request) = table.next() {
///     table.run(request, &client).await;
/// }
/// ```
#[derive(Debug)]
pub struct ReplaceController {
    config: WindowConfig,
    items: Vec<Record>,
    cursor: u32,
    generation: u64,
    requests: RequestTracker,
    mounted: bool,
    total: Option<usize>,
    sort: SortToggler,
    last_error: Option<String>,
}

impl ReplaceController {
    /// Creates an unmounted controller at page 0.
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            cursor: 0,
            generation: 0,
            requests: RequestTracker::default(),
            mounted: false,
            total: None,
            sort: SortToggler::new(),
            last_error: None,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mounts the view and issues the fetch for the current page.
    ///
    /// Mounting an already mounted controller issues nothing.
    pub fn mount(&mut self) -> Option<PageRequest> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.issue())
    }

    /// Unmounts the view; an outstanding fetch will be ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.requests.abandon();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Moves to page `n`, clamped to `[0, max_page]`.
    ///
    /// Setting the current page is accepted but issues no fetch. While
    /// unmounted the cursor moves and the fetch waits for [`mount`](Self::mount).
    pub fn set_cursor(&mut self, n: i64) -> Option<PageRequest> {
        let clamped = n.clamp(0, self.config.max_page as i64) as u32;
        if clamped == self.cursor {
            log::trace!("page {} already current", clamped);
            return None;
        }

        self.cursor = clamped;
        if !self.mounted {
            return None;
        }
        Some(self.issue())
    }

    /// Moves one page back, stopping at 0.
    pub fn prev(&mut self) -> Option<PageRequest> {
        self.set_cursor(self.cursor as i64 - 1)
    }

    /// Moves one page forward, stopping at `max_page`.
    pub fn next(&mut self) -> Option<PageRequest> {
        self.set_cursor(self.cursor as i64 + 1)
    }

    /// Jumps to the page typed into a free-text field.
    ///
    /// See [`parse_page_input`] for what counts as "no change".
    pub fn jump_to(&mut self, raw: &str) -> Option<PageRequest> {
        match parse_page_input(raw) {
            Some(n) => self.set_cursor(n),
            None => {
                log::trace!("page input {:?} keeps page {}", raw, self.cursor);
                None
            }
        }
    }

    /// Starts a new window generation; sort state from the previous window
    /// no longer applies.
    fn start_generation(&mut self) {
        self.generation += 1;
        self.sort.reset(self.generation);
    }

    fn issue(&mut self) -> PageRequest {
        self.items.clear();
        self.start_generation();

        let request = PageRequest {
            seq: self.requests.issue(),
            cursor: self.cursor,
            limit: self.config.page_size,
            skip: (self.cursor as usize).saturating_mul(self.config.page_size),
        };

        log::debug!(
            "requesting page {} (limit {}, skip {})",
            request.cursor,
            request.limit,
            request.skip
        );
        request
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Applies the result of `request`.
    ///
    /// Only the most recently issued request is applied; answers for pages
    /// navigated away from are dropped. A failed fetch leaves the window
    /// empty.
    pub fn complete(&mut self, request: &PageRequest, result: Result<Page, Error>) -> Completion {
        if !self.mounted || !self.requests.settle(request.seq) {
            log::warn!("dropping stale response for page {}", request.cursor);
            return Completion::Stale;
        }

        match result {
            Ok(page) => {
                self.last_error = None;
                if page.total().is_some() {
                    self.total = page.total();
                }
                self.items = page.into_records();
                self.start_generation();
                log::debug!("page {} loaded {} rows", request.cursor, self.items.len());
                Completion::Applied {
                    added: self.items.len(),
                }
            }
            Err(e) => {
                log::warn!("fetching page {} failed: {}", request.cursor, e);
                self.last_error = Some(e.to_string());
                Completion::Failed
            }
        }
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Header click on `column`: sorts the window ascending, or flips the
    /// direction if `column` was the last one sorted in this window.
    pub fn on_column_header_click(&mut self, column: &Column) -> Option<SortDirection> {
        self.sort
            .on_column_header_click(column, &mut self.items, self.generation)
    }

    /// Returns the sort direction shown for `key` in the current window.
    pub fn sort_direction(&self, key: &str) -> Option<SortDirection> {
        self.sort.direction(key, self.generation)
    }

    // =========================================================================
    // Async drivers
    // =========================================================================

    /// Runs `request` against `source` and applies the result.
    pub async fn run<Src>(&mut self, request: PageRequest, source: &Src) -> Completion
    where
        Src: OffsetSource + ?Sized,
    {
        let result = request.send(source).await;
        self.complete(&request, result)
    }

    /// Mounts the controller and loads the current page.
    pub async fn start<Src>(&mut self, source: &Src) -> Option<Completion>
    where
        Src: OffsetSource + ?Sized,
    {
        let request = self.mount()?;
        Some(self.run(request, source).await)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the records of the current page.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Returns the current page index.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Returns the window generation, bumped on every page change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while the current page is being fetched.
    pub fn is_loading(&self) -> bool {
        self.requests.is_waiting()
    }

    /// Returns `true` if the view is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the "previous" affordance should be enabled.
    pub fn can_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Whether the "next" affordance should be enabled.
    pub fn can_next(&self) -> bool {
        self.cursor < self.config.max_page
    }

    /// Returns the last total record count reported by the source.
    ///
    /// Informational only; navigation is bounded by `max_page` alone.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Returns the number of pages implied by [`total`](Self::total).
    pub fn page_count(&self) -> Option<usize> {
        match self.config.page_size {
            0 => None,
            size => self.total.map(|total| total.div_ceil(size)),
        }
    }

    /// Returns the message of the last failed fetch, cleared by a success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
}
