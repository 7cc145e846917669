//! Premium subscription gate.
//!
//! The premium flag is a `watch` channel so pages can react to changes. It is
//! written in exactly two places:
//! - [`PremiumGate::load_status`] at startup, from `GET /api/user/status`
//! - [`PremiumGate::purchase`] after a successful purchase, optimistically
//!
//! A subscription revoked server-side is only noticed on the next
//! `load_status`. Access checks themselves always ask the backend and fail
//! closed.

use std::sync::Arc;

use reqwest::Method;
use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::api::types::{PurchaseRequest, SubscriptionPlan, SubscriptionStatus};
use crate::api::{ApiClient, ApiError};
use crate::error::add_breadcrumb;
use crate::routes::{Access, Route};
use crate::services::auth::SessionStore;

/// Errors that can occur when talking to the subscription backend.
#[derive(Debug, Error)]
pub enum PremiumError {
    /// The operation needs a session and there is none.
    #[error("not logged in")]
    NotAuthenticated,

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PremiumError {
    /// Message suitable for the user after a failed purchase.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotAuthenticated => "Log in to purchase a plan.",
            Self::Api(e) => e.server_message().unwrap_or("Try again later."),
        }
    }
}

/// Premium gate.
///
/// Cheap to clone; clones share the flag.
#[derive(Debug, Clone)]
pub struct PremiumGate {
    api: ApiClient,
    session: SessionStore,
    flag: Arc<watch::Sender<bool>>,
}

impl PremiumGate {
    /// Create a gate with the flag unset.
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            flag: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Current value of the premium flag.
    #[must_use]
    pub fn is_premium(&self) -> bool {
        *self.flag.borrow()
    }

    /// Watch the premium flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// Clear the flag, e.g. after logout.
    pub fn reset(&self) {
        self.flag.send_replace(false);
    }

    /// Refresh the flag from the backend.
    ///
    /// Does nothing without a session. A failed request clears the flag.
    #[instrument(skip(self))]
    pub async fn load_status(&self) {
        let Some(token) = self.session.bearer() else {
            return;
        };

        let premium = match self.fetch_status(&token).await {
            Ok(status) => status.premium,
            Err(e) => {
                warn!(error = %e, "Failed to load subscription status");
                false
            }
        };
        self.flag.send_replace(premium);
    }

    /// Subscription status of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `PremiumError::NotAuthenticated` without a session (no request
    /// is made) or `PremiumError::Api` if the request fails.
    pub async fn status(&self) -> Result<SubscriptionStatus, PremiumError> {
        let token = self.session.bearer().ok_or(PremiumError::NotAuthenticated)?;
        Ok(self.fetch_status(&token).await?)
    }

    /// Decide whether a premium page may be entered.
    ///
    /// Makes one status request. Anything other than `premium: true`,
    /// including a missing session or a failed request, redirects to the
    /// plans page.
    #[instrument(skip(self))]
    pub async fn check_access(&self) -> Access {
        match self.status().await {
            Ok(status) if status.premium => Access::Allow,
            Ok(_) => Access::Redirect(Route::PremiumPlans),
            Err(e) => {
                warn!(error = %e, "Premium check failed, denying access");
                Access::Redirect(Route::PremiumPlans)
            }
        }
    }

    /// Available subscription plans.
    ///
    /// # Errors
    ///
    /// Returns `PremiumError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn plans(&self) -> Result<Vec<SubscriptionPlan>, PremiumError> {
        Ok(self.api.get(&["api", "plans"], None).await?)
    }

    /// Purchase a plan.
    ///
    /// On success the flag is set without re-fetching the status.
    ///
    /// # Errors
    ///
    /// Returns `PremiumError::NotAuthenticated` without a session or
    /// `PremiumError::Api` if the backend rejects the purchase.
    #[instrument(skip(self))]
    pub async fn purchase(&self, plan_id: &str) -> Result<(), PremiumError> {
        let token = self.session.bearer().ok_or(PremiumError::NotAuthenticated)?;

        self.api
            .send_ignoring_body(
                Method::POST,
                &["api", "purchase"],
                Some(&PurchaseRequest { plan: plan_id }),
                Some(&token),
            )
            .await?;

        self.flag.send_replace(true);
        add_breadcrumb("premium", "Plan purchased", Some(&[("plan", plan_id)]));
        info!(plan = %plan_id, "Plan purchased");

        Ok(())
    }

    async fn fetch_status(&self, token: &SecretString) -> Result<SubscriptionStatus, ApiError> {
        self.api.get(&["api", "user", "status"], Some(token)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use url::Url;

    use crate::storage::LocalStorage;

    fn gate() -> PremiumGate {
        // Nothing listens on port 9; requests fail fast
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap());
        let session = SessionStore::new(api.clone(), LocalStorage::in_memory());
        PremiumGate::new(api, session)
    }

    #[tokio::test]
    async fn test_anonymous_is_redirected_without_request() {
        let gate = gate();
        assert!(matches!(
            gate.status().await,
            Err(PremiumError::NotAuthenticated)
        ));
        assert_eq!(
            gate.check_access().await,
            Access::Redirect(Route::PremiumPlans)
        );
    }

    #[tokio::test]
    async fn test_load_status_without_session_keeps_flag() {
        let gate = gate();
        gate.flag.send_replace(true);
        gate.load_status().await;
        assert!(gate.is_premium());

        gate.reset();
        assert!(!gate.is_premium());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let gate = gate();
        let mut rx = gate.subscribe();
        assert!(!*rx.borrow());

        gate.flag.send_replace(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn test_user_message() {
        let rejected = PremiumError::Api(ApiError::Status {
            status: 402,
            message: Some("Tarjeta rechazada".to_string()),
        });
        assert_eq!(rejected.user_message(), "Tarjeta rechazada");

        let bare = PremiumError::Api(ApiError::Status {
            status: 500,
            message: None,
        });
        assert_eq!(bare.user_message(), "Try again later.");
    }
}
