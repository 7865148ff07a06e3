//! Boundary-crossing signal used to trigger incremental loads.
//!
//! A [`Sentinel`] watches a single rendered row (identified by its
//! [`RecordId`]) and reports when it crosses into the visible viewport.
//! Controllers only ever keep one target observed; [`SentinelBinding`] does
//! the bookkeeping so the previous target is released before a new one is
//! observed.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::model::RecordId;

/// Capability that watches rendered rows for visibility.
pub trait Sentinel {
    /// Starts watching `target`.
    fn observe(&mut self, target: &RecordId);

    /// Stops watching `target`.
    fn unobserve(&mut self, target: &RecordId);

    /// Stops watching everything.
    fn disconnect(&mut self);
}

/// Keeps a [`Sentinel`] bound to at most one target.
#[derive(Debug)]
pub struct SentinelBinding<S> {
    sentinel: S,
    target: Option<RecordId>,
}

impl<S: Sentinel> SentinelBinding<S> {
    /// Wraps an unbound sentinel.
    pub fn new(sentinel: S) -> Self {
        Self {
            sentinel,
            target: None,
        }
    }

    /// Binds the sentinel to `target`, releasing the previous target first.
    ///
    /// Rebinding to the current target is a no-op.
    pub fn rebind(&mut self, target: &RecordId) {
        if self.target.as_ref() == Some(target) {
            return;
        }
        if let Some(previous) = self.target.take() {
            self.sentinel.unobserve(&previous);
        }
        self.sentinel.observe(target);
        self.target = Some(target.clone());
    }

    /// Releases the current target and disconnects the sentinel.
    pub fn disconnect(&mut self) {
        self.target = None;
        self.sentinel.disconnect();
    }

    /// Returns the currently bound target.
    pub fn target(&self) -> Option<&RecordId> {
        self.target.as_ref()
    }

    /// Returns `true` if `target` is the bound target.
    pub fn is_bound_to(&self, target: &RecordId) -> bool {
        self.target.as_ref() == Some(target)
    }

    /// Returns a reference to the wrapped sentinel.
    pub fn sentinel(&self) -> &S {
        &self.sentinel
    }

    /// Returns a mutable reference to the wrapped sentinel.
    pub fn sentinel_mut(&mut self) -> &mut S {
        &mut self.sentinel
    }
}

// =============================================================================
// Viewport sentinel
// =============================================================================

/// A sentinel driven by scroll-position math instead of platform APIs.
///
/// The host reports the row index of each observed target and the visible
/// row range; [`crossing`](Self::crossing) then says whether the observed
/// target is inside the viewport.
///
/// # Example
///
/// ```
/// use pagewindow_lib::model::RecordId;
/// use pagewindow_lib::sentinel::{Sentinel, ViewportSentinel};
///
/// let mut sentinel = ViewportSentinel::new(10);
/// sentinel.observe(&RecordId::Int(9));
/// sentinel.place(&RecordId::Int(9), 9);
///
/// assert_eq!(sentinel.crossing(), Some((RecordId::Int(9), true)));
/// sentinel.scroll_to(20);
/// assert_eq!(sentinel.crossing(), Some((RecordId::Int(9), false)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ViewportSentinel {
    observed: Option<(RecordId, Option<usize>)>,
    offset: usize,
    height: usize,
}

impl ViewportSentinel {
    /// Creates a sentinel for a viewport `height` rows tall, scrolled to the top.
    pub fn new(height: usize) -> Self {
        Self {
            observed: None,
            offset: 0,
            height,
        }
    }

    /// Records the row index at which `target` is rendered.
    pub fn place(&mut self, target: &RecordId, row: usize) {
        if let Some((observed, slot)) = &mut self.observed
            && *observed == *target
        {
            *slot = Some(row);
        }
    }

    /// Scrolls the viewport so that `offset` is the first visible row.
    pub fn scroll_to(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Resizes the viewport.
    pub fn resize(&mut self, height: usize) {
        self.height = height;
    }

    /// Returns the visible row range.
    pub fn visible_range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.height)
    }

    /// Returns the observed target and whether it is inside the viewport.
    ///
    /// Returns `None` when nothing is observed or the target has not been
    /// placed yet.
    pub fn crossing(&self) -> Option<(RecordId, bool)> {
        let (target, row) = self.observed.as_ref()?;
        let row = (*row)?;
        Some((target.clone(), self.visible_range().contains(&row)))
    }
}

impl Sentinel for ViewportSentinel {
    fn observe(&mut self, target: &RecordId) {
        self.observed = Some((target.clone(), None));
    }

    fn unobserve(&mut self, target: &RecordId) {
        if self.observed.as_ref().is_some_and(|(observed, _)| observed == target) {
            self.observed = None;
        }
    }

    fn disconnect(&mut self) {
        self.observed = None;
    }
}

// =============================================================================
// Recording sentinel
// =============================================================================

/// A sentinel that only records which targets are observed.
///
/// Used in tests to check that exactly one row is watched at a time.
#[derive(Debug, Clone, Default)]
pub struct RecordingSentinel {
    observed: BTreeSet<RecordId>,
    observe_calls: usize,
    disconnects: usize,
}

impl RecordingSentinel {
    /// Creates a sentinel observing nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the targets currently observed.
    pub fn observed(&self) -> Vec<RecordId> {
        self.observed.iter().cloned().collect()
    }

    /// Returns how many times `observe` was called.
    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    /// Returns how many times `disconnect` was called.
    pub fn disconnects(&self) -> usize {
        self.disconnects
    }
}

impl Sentinel for RecordingSentinel {
    fn observe(&mut self, target: &RecordId) {
        self.observe_calls += 1;
        self.observed.insert(target.clone());
    }

    fn unobserve(&mut self, target: &RecordId) {
        self.observed.remove(target);
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.observed.clear();
    }
}
