//! Data source error types

/// Failures reported by a data source that did answer the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The search endpoint returned an envelope with `type: "error"`.
    #[error("Upstream reported an error: {}", .errors.join("; "))]
    Upstream {
        /// Error messages from the envelope.
        errors: Vec<String>,
    },

    /// The source cannot serve requests (closed, misconfigured, injected failure).
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}
