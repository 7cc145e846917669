//! Menu page: several meal sections loaded at once.
//!
//! Every section request is issued concurrently and joined. A section whose
//! request fails is shown empty with its error kept, so the page always has
//! one section per configured entry, in configuration order.

use futures::future::join_all;
use tracing::{instrument, warn};

use crate::catalog::{CatalogError, Meal, MealDbClient};

/// Where a section's meals come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionSource {
    /// Free-text search.
    Search(String),
    /// Category filter.
    Category(String),
    /// Main-ingredient filter.
    Ingredient(String),
}

/// One configured section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionConfig {
    pub title: String,
    pub source: SectionSource,
}

impl SectionConfig {
    #[must_use]
    pub fn new(title: impl Into<String>, source: SectionSource) -> Self {
        Self {
            title: title.into(),
            source,
        }
    }
}

/// The default menu: healthy, seafood, vegetarian and desserts.
#[must_use]
pub fn default_menu() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("Healthy", SectionSource::Search("healthy".to_string())),
        SectionConfig::new("Seafood", SectionSource::Category("Seafood".to_string())),
        SectionConfig::new(
            "Vegetarian",
            SectionSource::Category("Vegetarian".to_string()),
        ),
        SectionConfig::new("Desserts", SectionSource::Category("Dessert".to_string())),
    ]
}

/// A loaded section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub title: String,
    pub meals: Vec<Meal>,
    /// Why the section is empty, if its request failed.
    pub error: Option<String>,
}

impl MenuSection {
    /// True if the section's request failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Load every section concurrently.
#[instrument(skip(catalog, sections), fields(sections = sections.len()))]
pub async fn load_menu(catalog: &MealDbClient, sections: &[SectionConfig]) -> Vec<MenuSection> {
    let requests = sections.iter().map(|section| async move {
        let result = fetch_section(catalog, &section.source).await;
        into_section(section, result)
    });

    join_all(requests).await
}

async fn fetch_section(
    catalog: &MealDbClient,
    source: &SectionSource,
) -> Result<Vec<Meal>, CatalogError> {
    match source {
        SectionSource::Search(text) => catalog.search(text).await,
        SectionSource::Category(name) => catalog.by_category(name).await,
        SectionSource::Ingredient(name) => catalog.by_ingredient(name).await,
    }
}

fn into_section(config: &SectionConfig, result: Result<Vec<Meal>, CatalogError>) -> MenuSection {
    match result {
        Ok(meals) => MenuSection {
            title: config.title.clone(),
            meals,
            error: None,
        },
        Err(e) => {
            warn!(section = %config.title, error = %e, "Menu section failed to load");
            MenuSection {
                title: config.title.clone(),
                meals: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
