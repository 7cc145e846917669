//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MEALPLAN_API_URL` - Auth, subscription and profile backend (default: `http://localhost:5000`)
//! - `MEALDB_API_URL` - Recipe catalog base URL (default: `https://www.themealdb.com/api/json/v1/1`)
//! - `MEALPLAN_STORAGE_PATH` - Local storage file (default: `~/.meal-planner/storage.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backend URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default recipe catalog URL.
pub const DEFAULT_MEALDB_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Storage file name used when there is no home directory.
const FALLBACK_STORAGE_FILE: &str = ".meal-planner-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the auth/subscription/profile backend
    pub api_url: Url,
    /// Base URL of the recipe catalog
    pub mealdb_url: Url,
    /// Local storage file for the token and theme
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL variable is not a valid base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_base_url(
            "MEALPLAN_API_URL",
            &get_env_or_default("MEALPLAN_API_URL", DEFAULT_API_URL),
        )?;
        let mealdb_url = parse_base_url(
            "MEALDB_API_URL",
            &get_env_or_default("MEALDB_API_URL", DEFAULT_MEALDB_URL),
        )?;
        let storage_path =
            get_optional_env("MEALPLAN_STORAGE_PATH").map_or_else(default_storage_path, PathBuf::from);

        Ok(Self {
            api_url,
            mealdb_url,
            storage_path,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Build a configuration pointing at explicit endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if either URL cannot be used as a base.
    pub fn for_endpoints(
        api_url: &str,
        mealdb_url: &str,
        storage_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_base_url("MEALPLAN_API_URL", api_url)?,
            mealdb_url: parse_base_url("MEALDB_API_URL", mealdb_url)?,
            storage_path: storage_path.into(),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a URL that request paths will be appended to.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{value} cannot be used as a base URL"),
        ));
    }

    Ok(url)
}

/// `~/.meal-planner/storage.json`, or a file in the working directory when
/// the platform has no home directory.
fn default_storage_path() -> PathBuf {
    storage_path_under(dirs::home_dir())
}

fn storage_path_under(home: Option<PathBuf>) -> PathBuf {
    home.map_or_else(
        || PathBuf::from(FALLBACK_STORAGE_FILE),
        |home| home.join(".meal-planner").join("storage.json"),
    )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("TEST_URL", "http://localhost:5000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_parse_base_url_invalid() {
        let err = parse_base_url("TEST_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TEST_URL"));
    }

    #[test]
    fn test_parse_base_url_rejects_non_base() {
        let err = parse_base_url("TEST_URL", "mailto:a@b.com").unwrap_err();
        assert!(err.to_string().contains("cannot be used as a base URL"));
    }

    #[test]
    fn test_default_storage_path_under_home() {
        let path = storage_path_under(Some(PathBuf::from("/home/ana")));
        assert_eq!(path, PathBuf::from("/home/ana/.meal-planner/storage.json"));

        assert_eq!(storage_path_under(None), PathBuf::from(FALLBACK_STORAGE_FILE));

        if let Some(home) = dirs::home_dir() {
            assert!(default_storage_path().starts_with(home));
        }
    }

    #[test]
    fn test_for_endpoints() {
        let config = ClientConfig::for_endpoints(
            "http://127.0.0.1:9000",
            DEFAULT_MEALDB_URL,
            "/tmp/storage.json",
        )
        .unwrap();

        assert_eq!(config.api_url.port(), Some(9000));
        assert_eq!(config.mealdb_url.path(), "/api/json/v1/1");
        assert_eq!(config.storage_path, PathBuf::from("/tmp/storage.json"));
        assert!(config.sentry_dsn.is_none());
    }
}
