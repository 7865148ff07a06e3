//! Category selection for search queries

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::config::WindowConfig;

/// Draws a category for each search request from a fixed catalog.
///
/// With a seed the sequence of draws is repeatable. Requests never depend on
/// each other's category, so no ordering between draws is required.
#[derive(Debug, Clone)]
pub struct CategoryPicker {
    catalog: Vec<String>,
    rng: StdRng,
}

impl CategoryPicker {
    /// Creates a picker over `catalog`.
    pub fn new(catalog: Vec<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { catalog, rng }
    }

    /// Creates a picker from the catalog and seed of `config`.
    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(config.categories.clone(), config.category_seed)
    }

    /// Returns a category, or `None` when the catalog is empty.
    pub fn pick(&mut self) -> Option<String> {
        self.catalog.choose(&mut self.rng).cloned()
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }
}
