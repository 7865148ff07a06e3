//! Search envelope returned by the search endpoint.

use serde::Deserialize;

use crate::error::SourceError;
use crate::model::Record;

/// Response of a search request.
///
/// The endpoint wraps results in a tagged envelope:
///
/// ```json
/// {"type": "success", "results": [{"id": "a1", ...}]}
/// {"type": "error", "errors": ["rate limit exceeded"]}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResponse {
    /// The search succeeded.
    Success {
        /// Records on the requested page; empty once the source is exhausted.
        #[serde(default)]
        results: Vec<Record>,
        /// Total number of matches, if reported.
        #[serde(default)]
        total: Option<usize>,
    },
    /// The search endpoint answered with an error.
    Error {
        /// Error messages.
        #[serde(default)]
        errors: Vec<String>,
    },
}

impl SearchResponse {
    /// Creates a success envelope.
    pub fn success(results: Vec<Record>) -> Self {
        Self::Success {
            results,
            total: None,
        }
    }

    /// Creates an error envelope.
    pub fn error(errors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Error {
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` for a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the results, turning an error envelope into a [`SourceError`].
    pub fn into_results(self) -> Result<Vec<Record>, SourceError> {
        match self {
            Self::Success { results, .. } => Ok(results),
            Self::Error { errors } => Err(SourceError::Upstream { errors }),
        }
    }
}
