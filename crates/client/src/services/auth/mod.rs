//! Session store.
//!
//! Owns the bearer token issued at login. The token lives in local storage
//! under [`keys::ACCESS_TOKEN`] and is the only thing that makes a session:
//! present means authenticated, absent means anonymous. There is no expiry
//! check and no refresh; a token stays in use until [`SessionStore::logout`].

mod claims;
mod error;

pub use claims::TokenClaims;
pub use error::{
    AuthError, GENERIC_LOGIN_FAILURE, USER_NOT_FOUND_MESSAGE, WRONG_PASSWORD_MESSAGE,
};

use meal_planner_core::Email;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::api::types::{LoginRequest, LoginResponse, User};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::storage::{LocalStorage, StorageError, keys};

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
}

impl Session {
    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Claims decoded from the token, if it is a readable JWT.
    #[must_use]
    pub fn claims(&self) -> Option<TokenClaims> {
        TokenClaims::decode(self.token.expose_secret())
    }
}

/// Session store backed by local storage.
///
/// Cheap to clone; clones share the same storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    api: ApiClient,
    storage: LocalStorage,
}

impl SessionStore {
    /// Create a session store.
    #[must_use]
    pub const fn new(api: ApiClient, storage: LocalStorage) -> Self {
        Self { api, storage }
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted and the session is active.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongPassword` or `AuthError::UserNotFound` for the
    /// two known backend messages, `AuthError::Rejected` with the backend's
    /// message for any other rejection, and `AuthError::Api` if the backend
    /// could not be reached.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError> {
        let body = LoginRequest {
            email: email.as_str(),
            password_hash: password.expose_secret(),
        };

        let response: LoginResponse = self
            .api
            .send(Method::POST, &["login"], &body, None)
            .await
            .map_err(AuthError::from_login_failure)?;

        let token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.storage.set(keys::ACCESS_TOKEN, &token)?;

        set_sentry_user(email, Some(email.as_str()));
        add_breadcrumb("auth", "User logged in", None);
        info!("Logged in");

        Ok(Session {
            token: SecretString::from(token),
        })
    }

    /// End the session by deleting the stored token.
    ///
    /// Logging out without a session is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be deleted.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.storage.remove(keys::ACCESS_TOKEN)?;

        clear_sentry_user();
        add_breadcrumb("auth", "User logged out", None);
        info!("Logged out");

        Ok(())
    }

    /// The current session, if a non-empty token is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be read.
    pub fn session(&self) -> Result<Option<Session>, StorageError> {
        Ok(self
            .storage
            .get(keys::ACCESS_TOKEN)?
            .filter(|t| !t.is_empty())
            .map(|token| Session {
                token: SecretString::from(token),
            }))
    }

    /// The bearer token for authenticated requests.
    ///
    /// An unreadable store counts as no session.
    #[must_use]
    pub fn bearer(&self) -> Option<SecretString> {
        match self.session() {
            Ok(session) => session.map(|s| s.token),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// True if a token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    /// Claims of the stored token, if any can be decoded.
    #[must_use]
    pub fn claims(&self) -> Option<TokenClaims> {
        self.bearer()
            .and_then(|token| TokenClaims::decode(token.expose_secret()))
    }

    /// Email from the token claims.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.claims().and_then(|c| c.email)
    }

    /// Role of the logged-in user.
    ///
    /// Uses the token's `rol` claim, falling back to the account's `roles`
    /// looked up by the token's email. `None` without a session or when
    /// neither source names a role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the fallback lookup fails.
    #[instrument(skip(self))]
    pub async fn role(&self) -> Result<Option<String>, AuthError> {
        let Some(claims) = self.claims() else {
            return Ok(None);
        };

        if let Some(rol) = claims.rol.filter(|r| !r.is_empty()) {
            return Ok(Some(rol));
        }

        let Some(email) = claims.email else {
            return Ok(None);
        };

        let user: User = self
            .api
            .get(&["users", "email", &email], None)
            .await
            .map_err(AuthError::Api)?;

        Ok(user.roles.filter(|r| !r.is_empty()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use url::Url;

    fn store() -> SessionStore {
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap());
        SessionStore::new(api, LocalStorage::in_memory())
    }

    #[test]
    fn test_anonymous_by_default() {
        let store = store();
        assert!(!store.is_authenticated());
        assert!(store.session().unwrap().is_none());
        assert!(store.claims().is_none());
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let store = store();
        store.storage.set(keys::ACCESS_TOKEN, "").unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_opaque_token_authenticates_without_claims() {
        let store = store();
        store.storage.set(keys::ACCESS_TOKEN, "t1").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.bearer().unwrap().expose_secret(), "t1");
        assert!(store.email().is_none());
    }

    #[test]
    fn test_logout_removes_token() {
        let store = store();
        store.storage.set(keys::ACCESS_TOKEN, "t1").unwrap();

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.storage.get(keys::ACCESS_TOKEN).unwrap(), None);

        // Logging out twice is fine
        store.logout().unwrap();
    }

    #[tokio::test]
    async fn test_role_from_claim_needs_no_request() {
        let store = store();
        let payload = URL_SAFE_NO_PAD.encode(r#"{"email":"a@b.com","rol":"admin"}"#);
        store
            .storage
            .set(keys::ACCESS_TOKEN, &format!("h.{payload}.s"))
            .unwrap();

        assert_eq!(store.email().as_deref(), Some("a@b.com"));
        assert_eq!(store.role().await.unwrap().as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_role_without_session_is_none() {
        assert_eq!(store().role().await.unwrap(), None);
    }
}
