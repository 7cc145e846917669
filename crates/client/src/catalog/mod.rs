//! Recipe catalog client (TheMealDB-compatible JSON API).
//!
//! # Architecture
//!
//! - One `GET` per operation, no retries
//! - Every operation returns a typed `Result`; callers that want an empty-list
//!   fallback (menu sections) apply it themselves and keep the error
//! - By-id lookups are cached via `moka` (5 minute TTL)
//!
//! # Endpoints
//!
//! - `search.php?s=` - free-text search
//! - `filter.php?c=` - by category (partial records)
//! - `filter.php?i=` - by main ingredient (partial records)
//! - `lookup.php?i=` - by id

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use meal_planner_core::MealId;
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::api::endpoint;

pub use types::{Ingredient, Meal};
use types::MealsEnvelope;

/// Errors that can occur when querying the recipe catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(u16),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No meal with this id.
    #[error("meal not found: {0}")]
    NotFound(MealId),
}

/// Client for the recipe catalog.
///
/// Cheap to clone; clones share the connection pool and the cache.
#[derive(Clone)]
pub struct MealDbClient {
    inner: Arc<MealDbClientInner>,
}

struct MealDbClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<MealId, Meal>,
}

impl std::fmt::Debug for MealDbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealDbClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl MealDbClient {
    /// Create a client for the catalog at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(MealDbClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// Free-text search. No match is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<Meal>, CatalogError> {
        self.fetch("search.php", "s", text).await
    }

    /// Meals in a category. Records are partial.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_category(&self, category: &str) -> Result<Vec<Meal>, CatalogError> {
        self.fetch("filter.php", "c", category).await
    }

    /// Meals using a main ingredient. Records are partial.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_ingredient(&self, ingredient: &str) -> Result<Vec<Meal>, CatalogError> {
        self.fetch("filter.php", "i", ingredient).await
    }

    /// Look up one meal with its full record.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such meal, or
    /// another `CatalogError` if the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn by_id(&self, id: &MealId) -> Result<Meal, CatalogError> {
        if let Some(meal) = self.inner.cache.get(id).await {
            debug!("Cache hit for meal");
            return Ok(meal);
        }

        let meal = self
            .fetch("lookup.php", "i", id.as_str())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        self.inner.cache.insert(id.clone(), meal.clone()).await;

        Ok(meal)
    }

    async fn fetch(&self, path: &str, param: &str, value: &str) -> Result<Vec<Meal>, CatalogError> {
        let mut url = endpoint(&self.inner.base_url, &[path]);
        url.query_pairs_mut().append_pair(param, value);

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Recipe catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let envelope: MealsEnvelope = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse recipe catalog response"
            );
            CatalogError::Parse(e)
        })?;

        Ok(envelope.into_meals())
    }
}
