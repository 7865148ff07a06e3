//! Column sort toggling over an in-memory window.
//!
//! Clicking a column header sorts the window ascending by that column;
//! clicking the same column again flips the direction. Every click re-runs
//! a stable comparator, so the result is a true ascending or descending
//! order even if another column was sorted in between.
//!
//! Sort state is tied to the window generation it was computed against.
//! Once the window is replaced wholesale the old state no longer applies and
//! the next click starts again from ascending.

use std::cmp::Ordering;

use crate::model::Record;
use crate::model::Value;
use crate::model::compare_text;

/// How a column's values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Numeric comparison.
    Number,
    /// Case-folded text comparison.
    Text,
    /// Booleans compared as `false < true`.
    Flag,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Returns `true` for ascending.
    pub fn is_ascending(self) -> bool {
        self == Self::Ascending
    }
}

/// A table column bound to a record field.
///
/// # Example
///
/// ```
/// use pagewindow_lib::sort::{Column, ColumnKind};
///
/// let columns = vec![
///     Column::new("id", "ID", ColumnKind::Number),
///     Column::new("todo", "Todo", ColumnKind::Text),
///     Column::new("completed", "Completed", ColumnKind::Flag),
///     Column::new("userId", "User Id", ColumnKind::Number).unsortable(),
/// ];
/// assert!(!columns[3].sortable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Record field the column reads. `id` reads the record id.
    pub key: String,
    /// Header text.
    pub header: String,
    /// How values are compared.
    pub kind: ColumnKind,
    /// Whether header clicks sort by this column.
    pub sortable: bool,
}

impl Column {
    /// Creates a sortable column.
    pub fn new(key: impl Into<String>, header: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            kind,
            sortable: true,
        }
    }

    /// Makes the column ignore header clicks.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Compares two records by this column, ascending.
    ///
    /// Records missing the field sort before records that have it.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let a = column_value(a, &self.key);
        let b = column_value(b, &self.key);
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => compare_values(self.kind, &a, &b),
        }
    }
}

fn column_value(record: &Record, key: &str) -> Option<Value> {
    match record.get(key) {
        Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
        None if key == "id" => Some(match record.id() {
            crate::model::RecordId::Int(id) => Value::Int(*id),
            crate::model::RecordId::Text(id) => Value::String(id.clone()),
        }),
        None => None,
    }
}

fn compare_values(kind: ColumnKind, a: &Value, b: &Value) -> Ordering {
    match kind {
        ColumnKind::Number | ColumnKind::Flag => match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        },
        ColumnKind::Text => match (a.as_text(), b.as_text()) {
            (Some(a), Some(b)) => compare_text(&a, &b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        },
    }
}

/// Sorts `window` by `column` in `direction`. The sort is stable.
pub fn sort_window(window: &mut [Record], column: &Column, direction: SortDirection) {
    match direction {
        SortDirection::Ascending => window.sort_by(|a, b| column.compare(a, b)),
        SortDirection::Descending => window.sort_by(|a, b| column.compare(b, a)),
    }
}

/// Per-window sort state driven by header clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortToggler {
    generation: u64,
    active: Option<(String, SortDirection)>,
}

impl SortToggler {
    /// Creates a toggler with no active column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a click on `column`'s header.
    ///
    /// `generation` identifies the window contents; state recorded against
    /// another generation is discarded first. Returns the direction applied,
    /// or `None` if the column is not sortable.
    pub fn on_column_header_click(
        &mut self,
        column: &Column,
        window: &mut [Record],
        generation: u64,
    ) -> Option<SortDirection> {
        if !column.sortable {
            log::trace!("ignoring click on unsortable column {}", column.key);
            return None;
        }

        self.sync(generation);

        let direction = match &self.active {
            Some((key, direction)) if *key == column.key => direction.reversed(),
            _ => SortDirection::Ascending,
        };

        sort_window(window, column, direction);
        self.active = Some((column.key.clone(), direction));
        log::debug!("sorted {} rows by {} {:?}", window.len(), column.key, direction);

        Some(direction)
    }

    /// Returns the direction of `key` if it is the active column for `generation`.
    pub fn direction(&self, key: &str, generation: u64) -> Option<SortDirection> {
        if self.generation != generation {
            return None;
        }
        match &self.active {
            Some((active, direction)) if active == key => Some(*direction),
            _ => None,
        }
    }

    /// Returns the active column key and direction, regardless of generation.
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        self.active.as_ref().map(|(key, direction)| (key.as_str(), *direction))
    }

    /// Returns the generation the state was recorded against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forgets the active column and adopts `generation`.
    pub fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.active = None;
    }

    fn sync(&mut self, generation: u64) {
        if self.generation != generation {
            self.reset(generation);
        }
    }
}
