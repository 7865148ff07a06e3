//! Error types

mod api;
mod source;

pub use api::*;
pub use source::*;

/// Top-level error returned by fetch collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or protocol failure talking to a remote endpoint.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The data source answered, but reported a failure.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Invalid client or controller configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
