//! HTTP client for the paged-data endpoints

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::api::OffsetSource;
use crate::api::Page;
use crate::api::SearchResponse;
use crate::api::SearchSource;
use crate::api::query::offset_url;
use crate::api::query::search_url;
use crate::error::ApiError;
use crate::error::Error;

/// Default JSON key of the record array in offset responses.
pub const DEFAULT_COLLECTION_KEY: &str = "items";

/// HTTP client serving both offset pages and search pages.
///
/// This client is cheap to clone (uses `Arc` internally) and is meant to be
/// constructed once and handed to each controller that needs it.
///
/// # Example
///
/// ```ignore
/// use pagewindow_lib::PageClient;
///
/// let client = PageClient::builder()
///     .url("https://dummyjson.com/todos")
///     .collection_key("todos")
///     .build();
///
/// let page = client.fetch_offset(10, 0).await?;
/// ```
#[derive(Clone)]
pub struct PageClient {
    inner: Arc<PageClientInner>,
}

struct PageClientInner {
    url: String,
    search_url: Option<String>,
    collection_key: String,
    access_key: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl PageClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> PageClientBuilder<Missing> {
        PageClientBuilder::new()
    }

    /// Returns the offset endpoint URL.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Returns the search endpoint URL, if configured.
    pub fn search_url(&self) -> Option<&str> {
        self.inner.search_url.as_deref()
    }

    /// Returns the JSON key of the record array in offset responses.
    pub fn collection_key(&self) -> &str {
        &self.inner.collection_key
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value, ApiError> {
        log::debug!("GET {}", url);

        let mut request = self.inner.http_client.get(url);
        if let Some(key) = &self.inner.access_key {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Client-ID {}", key));
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

impl std::fmt::Debug for PageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageClient")
            .field("url", &self.inner.url)
            .field("search_url", &self.inner.search_url)
            .field("collection_key", &self.inner.collection_key)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

#[async_trait]
impl OffsetSource for PageClient {
    async fn fetch_offset(&self, limit: usize, skip: usize) -> Result<Page, Error> {
        let url = offset_url(&self.inner.url, limit, skip)?;
        let body = self.get_json(url).await?;
        Ok(Page::from_json(body, &self.inner.collection_key)?)
    }
}

#[async_trait]
impl SearchSource for PageClient {
    async fn search(
        &self,
        page: u32,
        per_page: usize,
        query: Option<&str>,
    ) -> Result<SearchResponse, Error> {
        let base = self
            .inner
            .search_url
            .as_deref()
            .ok_or_else(|| Error::config("search URL not configured"))?;
        let url = search_url(base, page, per_page, query)?;
        let body = self.get_json(url).await?;
        let response = serde_json::from_value(body.clone())
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body.to_string()))?;
        Ok(response)
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`PageClient`].
///
/// Uses the typestate pattern so that `build()` is only available once the
/// offset endpoint URL has been set.
///
/// # Example
///
/// ```ignore
/// let client = PageClient::builder()
///     .url("https://dummyjson.com/todos")
///     .collection_key("todos")
///     .search_url("https://search.example.com/photos")
///     .access_key("my-access-key")
///     .timeout(Duration::from_secs(10))
///     .build();
/// ```
pub struct PageClientBuilder<U> {
    url: U,
    search_url: Option<String>,
    collection_key: String,
    access_key: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl PageClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            search_url: None,
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            access_key: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the offset endpoint URL.
    pub fn url(self, url: impl Into<String>) -> PageClientBuilder<Set<String>> {
        PageClientBuilder {
            url: Set(url.into()),
            search_url: self.search_url,
            collection_key: self.collection_key,
            access_key: self.access_key,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for PageClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> PageClientBuilder<U> {
    /// Sets the search endpoint URL.
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }

    /// Sets the JSON key of the record array in offset responses.
    ///
    /// Defaults to `items`.
    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.collection_key = key.into();
        self
    }

    /// Sets an access key, sent as `Authorization: Client-ID <key>`.
    pub fn access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl PageClientBuilder<Set<String>> {
    /// Builds the [`PageClient`].
    pub fn build(self) -> PageClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        PageClient {
            inner: Arc::new(PageClientInner {
                url: self.url.0,
                search_url: self.search_url,
                collection_key: self.collection_key,
                access_key: self.access_key,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}
