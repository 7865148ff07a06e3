//! Query string generation for the paged-data endpoints.

use url::Url;

use crate::error::ApiError;

fn parse_base(base: &str) -> Result<Url, ApiError> {
    Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))
}

/// Builds `<base>?limit=<limit>&skip=<skip>`.
///
/// Query parameters already present on `base` are kept.
pub fn offset_url(base: &str, limit: usize, skip: usize) -> Result<Url, ApiError> {
    let mut url = parse_base(base)?;
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string())
        .append_pair("skip", &skip.to_string());
    Ok(url)
}

/// Builds `<base>?page=<page>&perPage=<per_page>[&query=<query>]`.
pub fn search_url(
    base: &str,
    page: u32,
    per_page: usize,
    query: Option<&str>,
) -> Result<Url, ApiError> {
    let mut url = parse_base(base)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("page", &page.to_string())
            .append_pair("perPage", &per_page.to_string());
        if let Some(query) = query {
            pairs.append_pair("query", query);
        }
    }
    Ok(url)
}
