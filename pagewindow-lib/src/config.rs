//! Window configuration

/// Categories used to vary search queries when no catalog is configured.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "nature", "architecture", "animals", "travel", "food", "street", "ocean", "mountains",
    "technology", "people",
];

/// Configuration shared by the load controllers.
///
/// # Example
///
/// ```
/// use pagewindow_lib::config::WindowConfig;
///
/// let config = WindowConfig::default()
///     .with_page_size(20)
///     .with_max_page(9)
///     .with_category_seed(7);
///
/// assert_eq!(config.page_size, 20);
/// assert_eq!(config.max_page, 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Records per page for the paged table (offset = cursor * page_size).
    ///
    /// Default: 10
    pub page_size: usize,

    /// Highest page index the paged table can navigate to.
    ///
    /// Default: 25
    pub max_page: u32,

    /// Records requested per search page by the growing list.
    ///
    /// Default: 10
    pub per_page: usize,

    /// Initial cursor of the growing list. Search pages are 1-based.
    ///
    /// Default: 1
    pub first_page: u32,

    /// Catalog of categories a search query is drawn from. Empty disables
    /// the query parameter.
    pub categories: Vec<String>,

    /// Seed for category selection. `None` seeds from the OS.
    pub category_seed: Option<u64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_page: 25,
            per_page: 10,
            first_page: 1,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            category_seed: None,
        }
    }
}

impl WindowConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paged table page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the highest reachable page index.
    pub fn with_max_page(mut self, max_page: u32) -> Self {
        self.max_page = max_page;
        self
    }

    /// Sets the growing list page size.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the initial cursor of the growing list.
    pub fn with_first_page(mut self, first_page: u32) -> Self {
        self.first_page = first_page;
        self
    }

    /// Replaces the category catalog.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Makes category selection repeatable.
    pub fn with_category_seed(mut self, seed: u64) -> Self {
        self.category_seed = Some(seed);
        self
    }

    /// Creates a config whose searches carry no category query.
    pub fn without_categories() -> Self {
        Self {
            categories: Vec::new(),
            ..Self::default()
        }
    }
}
