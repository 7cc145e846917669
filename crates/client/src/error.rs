//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends. Unexpected failures are
//! captured to Sentry by [`AppError::report`]; failures the user caused
//! (invalid forms, wrong password) are only logged.

use thiserror::Error;

use crate::api::ApiError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::models::CartError;
use crate::routes::UnknownRoute;
use crate::routes::plan::PlanError;
use crate::services::{AccountError, AuthError, PremiumError};
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Application-level error type for the meal planner client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Recipe catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Subscription error: {0}")]
    Premium(#[from] PremiumError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error(transparent)]
    Route(#[from] UnknownRoute),

    /// The page needs a session.
    #[error("Not logged in")]
    Unauthorized,

    /// The page needs a premium subscription.
    #[error("A premium subscription is required")]
    PremiumRequired,
}

impl AppError {
    /// True for failures caused by the user's input or state rather than by
    /// the system. These are not sent to Sentry.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::Cart(_)
            | Self::Route(_)
            | Self::Unauthorized
            | Self::PremiumRequired => true,
            Self::Auth(err) => !matches!(err, AuthError::Api(_) | AuthError::Storage(_)),
            Self::Account(err) => matches!(
                err,
                AccountError::Validation(_)
                    | AccountError::NotAuthenticated
                    | AccountError::Registration { .. }
            ),
            Self::Premium(err) => matches!(err, PremiumError::NotAuthenticated),
            Self::Plan(err) => matches!(
                err,
                PlanError::Validation(_) | PlanError::NotEnoughRecipes { .. }
            ),
            Self::Config(_)
            | Self::Storage(_)
            | Self::Api(_)
            | Self::Catalog(_) => false,
        }
    }

    /// Log the error and, if it is unexpected, capture it to Sentry.
    pub fn report(&self) {
        if self.is_user_error() {
            tracing::info!(error = %self, "Request rejected");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Operation failed"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added meal", Some(&[("meal_id", "52772")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
