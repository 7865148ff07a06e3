//! Incremental loading controllers
//!
//! Two controllers share one idea of "windowed loading state":
//!
//! - [`AppendController`] - a growing list. A sentinel crossing advances the
//!   cursor and the fetched batch is appended.
//! - [`ReplaceController`] - a paged table. Explicit navigation sets the
//!   cursor and the window is replaced by exactly one fetched page.
//!
//! Both are driven in two steps. A trigger (`mount`, `next`, a sentinel
//! crossing, ...) updates the state and returns a request ticket; the host
//! runs the ticket against a data source and hands the result back through
//! `complete`. Every ticket carries a sequence number, and only the
//! completion of the most recent ticket may touch the window. Late answers
//! for superseded requests, and anything arriving after `unmount`, are
//! dropped.

mod append;
mod replace;

pub use append::*;
pub use replace::*;

/// Loading state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadState {
    /// Page index (table) or page-request counter (list) of the latest fetch.
    pub cursor: u32,
    /// A fetch is outstanding.
    pub loading: bool,
    /// Further fetches may still return data.
    pub has_more: bool,
}

impl LoadState {
    /// Creates an idle state at `cursor`.
    pub fn new(cursor: u32) -> Self {
        Self {
            cursor,
            loading: false,
            has_more: true,
        }
    }
}

/// What applying a completed fetch did to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Records were merged into the window.
    Applied {
        /// Number of records the fetch contributed.
        added: usize,
    },
    /// The fetch returned nothing; no further fetches will be issued.
    Exhausted,
    /// The fetch failed and was recovered locally.
    Failed,
    /// The response belonged to a superseded request or an unmounted view
    /// and was ignored.
    Stale,
}

impl Completion {
    /// Returns `true` if the completion changed the window or load state.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Stale)
    }
}

/// Hands out increasing request sequence numbers and remembers the one
/// whose answer is still awaited.
#[derive(Debug, Clone, Default)]
struct RequestTracker {
    next: u64,
    awaited: Option<u64>,
}

impl RequestTracker {
    fn issue(&mut self) -> u64 {
        self.next += 1;
        self.awaited = Some(self.next);
        self.next
    }

    /// Returns `true` and stops waiting if `seq` is the awaited request.
    fn settle(&mut self, seq: u64) -> bool {
        if self.awaited == Some(seq) {
            self.awaited = None;
            true
        } else {
            false
        }
    }

    fn abandon(&mut self) {
        self.awaited = None;
    }

    fn is_waiting(&self) -> bool {
        self.awaited.is_some()
    }
}
