//! Growing list driven by a visibility sentinel.

use crate::api::SearchSource;
use crate::category::CategoryPicker;
use crate::config::WindowConfig;
use crate::error::Error;
use crate::model::Record;
use crate::model::RecordId;
use crate::sentinel::Sentinel;
use crate::sentinel::SentinelBinding;

use super::Completion;
use super::LoadState;
use super::RequestTracker;

/// A search page requested by an [`AppendController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendRequest {
    /// Sequence number matched on completion.
    pub seq: u64,
    /// 1-based page to fetch.
    pub page: u32,
    /// Records per page.
    pub per_page: usize,
    /// Category query, if the catalog is non-empty.
    pub query: Option<String>,
}

impl AppendRequest {
    /// Runs the request against `source`.
    ///
    /// An error envelope from the source is turned into an [`Error`].
    pub async fn send<S>(&self, source: &S) -> Result<Vec<Record>, Error>
    where
        S: SearchSource + ?Sized,
    {
        let response = source
            .search(self.page, self.per_page, self.query.as_deref())
            .await?;
        Ok(response.into_results()?)
    }
}

/// Controller for an infinite-scroll list.
///
/// The cursor only advances when the sentinel reports that the last rendered
/// row became visible. Each fetched batch is appended; the window never
/// shrinks. An empty batch or a failed fetch ends loading for the lifetime of
/// the controller (or until [`reset`](Self::reset)).
///
/// # Example
///
/// ```ignore
/// use pagewindow_lib::controller::AppendController;
/// use pagewindow_lib::sentinel::ViewportSentinel;
///
/// let mut list = AppendController::new(WindowConfig::default(), ViewportSentinel::new(20));
///
/// if let Some(request) = list.mount() {
///     let result = request.send(&client).await;
///     list.complete(&request, result);
/// }
///
/// // Later, from the sentinel callback:
/// if let Some((target, visible)) = list.sentinel().crossing()
///     && let Some(request) = list.on_crossing(&target, visible)
/// {
///     let result = request.send(&client).await;
///     list.complete(&request, result);
/// }
/// ```
#[derive(Debug)]
pub struct AppendController<S> {
    config: WindowConfig,
    picker: CategoryPicker,
    items: Vec<Record>,
    state: LoadState,
    binding: SentinelBinding<S>,
    requests: RequestTracker,
    mounted: bool,
    last_error: Option<String>,
}

impl<S: Sentinel> AppendController<S> {
    /// Creates an unmounted controller observing rows through `sentinel`.
    pub fn new(config: WindowConfig, sentinel: S) -> Self {
        Self {
            picker: CategoryPicker::from_config(&config),
            state: LoadState::new(config.first_page),
            config,
            items: Vec::new(),
            binding: SentinelBinding::new(sentinel),
            requests: RequestTracker::default(),
            mounted: false,
            last_error: None,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mounts the view and issues the fetch for the initial cursor.
    ///
    /// Every mount starts from an empty window, so a remounted list loads
    /// from the first page again. Mounting an already mounted controller
    /// issues nothing.
    pub fn mount(&mut self) -> Option<AppendRequest> {
        if self.mounted {
            return None;
        }
        self.clear_window();
        self.mounted = true;
        self.issue()
    }

    /// Unmounts the view: the sentinel is disconnected and any outstanding
    /// fetch will be ignored when it completes.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.requests.abandon();
        self.binding.disconnect();
        log::debug!("list unmounted with {} rows", self.items.len());
    }

    /// Clears the window and starts over from the initial cursor.
    ///
    /// This is the only way to leave the exhausted state. Returns the request
    /// for the first page when mounted.
    pub fn reset(&mut self) -> Option<AppendRequest> {
        self.clear_window();
        self.binding.disconnect();

        if self.mounted { self.issue() } else { None }
    }

    fn clear_window(&mut self) {
        self.items.clear();
        self.state = LoadState::new(self.config.first_page);
        self.requests.abandon();
        self.last_error = None;
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Sentinel callback.
    ///
    /// Acts only when `is_intersecting` is true and `target` is the row the
    /// sentinel is currently bound to. The loading guard is checked here, at
    /// callback time, so a crossing during an outstanding fetch is dropped.
    pub fn on_crossing(&mut self, target: &RecordId, is_intersecting: bool) -> Option<AppendRequest> {
        if !is_intersecting {
            return None;
        }
        if !self.binding.is_bound_to(target) {
            log::trace!("ignoring crossing for unbound row {}", target);
            return None;
        }
        self.on_sentinel_visible()
    }

    /// Advances the cursor and issues a fetch.
    ///
    /// Does nothing while a fetch is outstanding, once the list is exhausted,
    /// or when unmounted.
    pub fn on_sentinel_visible(&mut self) -> Option<AppendRequest> {
        if !self.mounted {
            log::trace!("ignoring sentinel: not mounted");
            return None;
        }
        if self.state.loading {
            log::trace!("ignoring sentinel: page {} still loading", self.state.cursor);
            return None;
        }
        if !self.state.has_more {
            log::trace!("ignoring sentinel: list exhausted");
            return None;
        }

        let Some(next) = self.state.cursor.checked_add(1) else {
            log::warn!("page cursor exhausted at {}", self.state.cursor);
            self.state.has_more = false;
            return None;
        };
        self.state.cursor = next;
        self.issue()
    }

    fn issue(&mut self) -> Option<AppendRequest> {
        if !self.state.has_more {
            return None;
        }

        let request = AppendRequest {
            seq: self.requests.issue(),
            page: self.state.cursor,
            per_page: self.config.per_page,
            query: self.picker.pick(),
        };
        self.state.loading = true;

        log::debug!(
            "requesting page {} ({} per page, query {:?})",
            request.page,
            request.per_page,
            request.query
        );
        Some(request)
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Applies the result of `request`.
    ///
    /// Success appends the batch (no de-duplication against earlier batches)
    /// and rebinds the sentinel to the new last row; an empty batch marks the
    /// list exhausted. Failure also marks the list exhausted. In every applied
    /// case `loading` is cleared.
    pub fn complete(&mut self, request: &AppendRequest, result: Result<Vec<Record>, Error>) -> Completion {
        if !self.mounted || !self.requests.settle(request.seq) {
            log::warn!("dropping stale response for page {}", request.page);
            return Completion::Stale;
        }

        self.state.loading = false;

        match result {
            Ok(batch) => {
                self.last_error = None;
                self.state.has_more = !batch.is_empty();
                if batch.is_empty() {
                    log::debug!("page {} empty, list exhausted at {} rows", request.page, self.items.len());
                    return Completion::Exhausted;
                }

                let added = batch.len();
                self.items.extend(batch);
                self.rebind_sentinel();
                log::debug!("page {} appended {} rows ({} total)", request.page, added, self.items.len());
                Completion::Applied { added }
            }
            Err(e) => {
                log::warn!("fetching page {} failed, stopping: {}", request.page, e);
                self.state.has_more = false;
                self.last_error = Some(e.to_string());
                Completion::Failed
            }
        }
    }

    /// Binds the sentinel to the last row of the window, if any.
    ///
    /// Call after every render; the previous row is released first.
    pub fn rebind_sentinel(&mut self) {
        if let Some(last) = self.items.last() {
            let id = last.id().clone();
            self.binding.rebind(&id);
        }
    }

    // =========================================================================
    // Async drivers
    // =========================================================================

    /// Runs `request` against `source` and applies the result.
    pub async fn run<Src>(&mut self, request: AppendRequest, source: &Src) -> Completion
    where
        Src: SearchSource + ?Sized,
    {
        let result = request.send(source).await;
        self.complete(&request, result)
    }

    /// Mounts the controller and loads the initial page.
    pub async fn start<Src>(&mut self, source: &Src) -> Option<Completion>
    where
        Src: SearchSource + ?Sized,
    {
        let request = self.mount()?;
        Some(self.run(request, source).await)
    }

    /// Behaves like a sentinel crossing followed by the fetch it triggers.
    ///
    /// Returns `None` when the trigger was ignored.
    pub async fn load_more<Src>(&mut self, source: &Src) -> Option<Completion>
    where
        Src: SearchSource + ?Sized,
    {
        let request = self.on_sentinel_visible()?;
        Some(self.run(request, source).await)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the records loaded so far.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Returns the load state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns the current cursor.
    pub fn cursor(&self) -> u32 {
        self.state.cursor
    }

    /// Returns `true` while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Returns `true` while further fetches may return data.
    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    /// Returns `true` if the view is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether to show a loading indicator.
    pub fn show_spinner(&self) -> bool {
        self.state.loading
    }

    /// Whether to show the end-of-results banner.
    ///
    /// Only once something has loaded, so an empty first page shows nothing.
    pub fn show_end_banner(&self) -> bool {
        !self.state.has_more && !self.items.is_empty()
    }

    /// Returns the message of the last failed fetch, cleared by a success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the row the sentinel is bound to.
    pub fn sentinel_target(&self) -> Option<&RecordId> {
        self.binding.target()
    }

    /// Returns a reference to the sentinel.
    pub fn sentinel(&self) -> &S {
        self.binding.sentinel()
    }

    /// Returns a mutable reference to the sentinel, e.g. to feed it
    /// viewport updates.
    pub fn sentinel_mut(&mut self) -> &mut S {
        self.binding.sentinel_mut()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
}
