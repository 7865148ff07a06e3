//! Wire types and URL construction for the paged-data endpoints.
//!
//! - [`Page`] - one offset page of records plus the reported total
//! - [`SearchResponse`] - the `{"type": ..., "results": [...]}` search envelope
//! - [`offset_url`] / [`search_url`] - query string generation

mod page;
mod search;
mod url;

pub use page::Page;
pub use search::SearchResponse;
pub use url::offset_url;
pub use url::search_url;
