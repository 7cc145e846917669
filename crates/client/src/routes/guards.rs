//! Route-access guards.
//!
//! Two independent checks, consulted before entering a page:
//! - [`AuthGuard`] - a session must exist, else go to the login page
//! - [`PremiumGuard`] - the backend must report a premium subscription, else
//!   go to the plans page
//!
//! A page needing both is checked auth first, so an anonymous visitor never
//! triggers a subscription request.

use tracing::debug;

use super::{Requirement, Route};
use crate::services::auth::SessionStore;
use crate::services::premium::PremiumGate;

/// Result of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

impl Access {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The page actually shown when navigating to `requested`.
    #[must_use]
    pub const fn destination(self, requested: Route) -> Route {
        match self {
            Self::Allow => requested,
            Self::Redirect(to) => to,
        }
    }
}

/// Requires a session.
#[derive(Debug, Clone, Copy)]
pub struct AuthGuard<'a> {
    session: &'a SessionStore,
}

impl<'a> AuthGuard<'a> {
    #[must_use]
    pub const fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn check(&self) -> Access {
        if self.session.is_authenticated() {
            Access::Allow
        } else {
            Access::Redirect(Route::Login)
        }
    }
}

/// Requires a premium subscription. Fails closed.
#[derive(Debug, Clone, Copy)]
pub struct PremiumGuard<'a> {
    premium: &'a PremiumGate,
}

impl<'a> PremiumGuard<'a> {
    #[must_use]
    pub const fn new(premium: &'a PremiumGate) -> Self {
        Self { premium }
    }

    pub async fn check(&self) -> Access {
        self.premium.check_access().await
    }
}

/// Decide whether `route` may be entered.
pub async fn evaluate(route: Route, session: &SessionStore, premium: &PremiumGate) -> Access {
    let access = match route.requirement() {
        Requirement::Public => Access::Allow,
        Requirement::Anonymous => {
            if session.is_authenticated() {
                Access::Redirect(Route::Home)
            } else {
                Access::Allow
            }
        }
        Requirement::Authenticated => AuthGuard::new(session).check(),
        Requirement::Premium => match AuthGuard::new(session).check() {
            Access::Allow => PremiumGuard::new(premium).check().await,
            redirect @ Access::Redirect(_) => redirect,
        },
    };

    debug!(route = %route, ?access, "Evaluated route access");
    access
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use url::Url;

    use crate::api::ApiClient;
    use crate::storage::{LocalStorage, keys};

    fn services() -> (SessionStore, PremiumGate, LocalStorage) {
        let storage = LocalStorage::in_memory();
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap());
        let session = SessionStore::new(api.clone(), storage.clone());
        let premium = PremiumGate::new(api, session.clone());
        (session, premium, storage)
    }

    #[tokio::test]
    async fn test_anonymous_visitor() {
        let (session, premium, _) = services();

        assert_eq!(evaluate(Route::Login, &session, &premium).await, Access::Allow);
        assert_eq!(evaluate(Route::Contact, &session, &premium).await, Access::Allow);
        assert_eq!(
            evaluate(Route::Menu, &session, &premium).await,
            Access::Redirect(Route::Login)
        );
        // Auth is checked before premium
        assert_eq!(
            evaluate(Route::PremiumFeatures, &session, &premium).await,
            Access::Redirect(Route::Login)
        );
    }

    #[tokio::test]
    async fn test_authenticated_visitor() {
        let (session, premium, storage) = services();
        storage.set(keys::ACCESS_TOKEN, "t1").unwrap();

        assert_eq!(
            evaluate(Route::Login, &session, &premium).await,
            Access::Redirect(Route::Home)
        );
        assert_eq!(
            evaluate(Route::Register, &session, &premium).await,
            Access::Redirect(Route::Home)
        );
        assert_eq!(evaluate(Route::Cart, &session, &premium).await, Access::Allow);
    }

    #[test]
    fn test_destination() {
        assert_eq!(Access::Allow.destination(Route::Menu), Route::Menu);
        assert_eq!(
            Access::Redirect(Route::Login).destination(Route::Menu),
            Route::Login
        );
    }
}
