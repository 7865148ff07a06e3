//! Page type for offset-addressed results.

use crate::error::ApiError;
use crate::model::Record;

/// A page of records returned by an offset endpoint.
///
/// The endpoint answers `{ "<collection>": [...], "total": N, ... }`; the
/// collection key varies between services, so it is supplied when parsing.
///
/// # Example
///
/// ```
/// use pagewindow_lib::api::Page;
///
/// let body = serde_json::json!({
///     "todos": [{"id": 1, "todo": "Buy milk"}],
///     "total": 254,
/// });
/// let page = Page::from_json(body, "todos").unwrap();
///
/// assert_eq!(page.len(), 1);
/// assert_eq!(page.total(), Some(254));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    records: Vec<Record>,
    /// Total record count reported by the endpoint, if any.
    total: Option<usize>,
}

impl Page {
    /// Creates a new page with records and no total.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            total: None,
        }
    }

    /// Sets the total record count.
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Parses an offset endpoint body.
    ///
    /// The array under `collection_key` becomes the records. A missing
    /// collection or a malformed record is a parse error; a missing or
    /// non-numeric `total` is ignored.
    pub fn from_json(body: serde_json::Value, collection_key: &str) -> Result<Self, ApiError> {
        let serde_json::Value::Object(mut object) = body else {
            return Err(ApiError::parse("expected a JSON object"));
        };

        let total = object
            .get("total")
            .and_then(serde_json::Value::as_u64)
            .map(|n| n as usize);

        let collection = object.remove(collection_key).ok_or_else(|| {
            ApiError::parse(format!("missing `{}` collection", collection_key))
        })?;

        let records: Vec<Record> = serde_json::from_value(collection)
            .map_err(|e| ApiError::parse(format!("invalid `{}` collection: {}", collection_key, e)))?;

        Ok(Self { records, total })
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the total record count, if the endpoint reported one.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
