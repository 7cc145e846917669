//! Login page flow.
//!
//! ```text
//! Anonymous ──submit──▶ Submitting ──ok──▶ Authenticated (go home)
//!     ▲                     │
//!     └──────── error ──────┘
//! ```
//!
//! Form validation runs before `Submitting`; an invalid form never reaches
//! the backend. After a failure the form can be submitted again.

use meal_planner_core::Email;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::Route;
use crate::services::auth::{AuthError, SessionStore};
use crate::validation::{self, ValidationError};

/// State of the login page.
#[derive(Debug)]
pub enum LoginState {
    /// Waiting for input. Carries the last failure, if any.
    Anonymous { error: Option<AuthError> },
    /// A login request is in flight.
    Submitting,
    /// Logged in.
    Authenticated,
}

/// Drives the login page.
#[derive(Debug)]
pub struct LoginFlow {
    state: LoginState,
}

impl LoginFlow {
    /// Start the flow. A visitor who already has a session starts
    /// authenticated.
    #[must_use]
    pub fn new(session: &SessionStore) -> Self {
        let state = if session.is_authenticated() {
            LoginState::Authenticated
        } else {
            LoginState::Anonymous { error: None }
        };
        Self { state }
    }

    #[must_use]
    pub const fn state(&self) -> &LoginState {
        &self.state
    }

    /// True unless a request is in flight or the user is logged in.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        matches!(self.state, LoginState::Anonymous { .. })
    }

    /// The last failure, if the flow is waiting after one.
    #[must_use]
    pub const fn error(&self) -> Option<&AuthError> {
        match &self.state {
            LoginState::Anonymous { error } => error.as_ref(),
            _ => None,
        }
    }

    /// Take the last failure, ending the flow.
    #[must_use]
    pub fn into_error(self) -> Option<AuthError> {
        match self.state {
            LoginState::Anonymous { error } => error,
            _ => None,
        }
    }

    /// Where the page points next: home once logged in, registration after
    /// an unknown-user failure, otherwise the login page itself.
    #[must_use]
    pub fn next_route(&self) -> Route {
        match &self.state {
            LoginState::Authenticated => Route::Home,
            LoginState::Anonymous { error: Some(e) } if e.suggests_registration() => {
                Route::Register
            }
            _ => Route::Login,
        }
    }

    /// Submit the form.
    ///
    /// Returns the page to show next: [`Route::Home`] on success,
    /// [`Route::Login`] on any failure (see [`Self::error`]).
    #[instrument(skip(self, session, password))]
    pub async fn submit(
        &mut self,
        session: &SessionStore,
        email: &str,
        password: &SecretString,
    ) -> Route {
        if !self.can_submit() {
            return self.next_route();
        }

        let email = match validate(email, password) {
            Ok(email) => email,
            Err(e) => {
                self.state = LoginState::Anonymous {
                    error: Some(e.into()),
                };
                return Route::Login;
            }
        };

        self.state = LoginState::Submitting;

        match session.login(&email, password).await {
            Ok(_) => {
                self.state = LoginState::Authenticated;
                Route::Home
            }
            Err(e) => {
                self.state = LoginState::Anonymous { error: Some(e) };
                Route::Login
            }
        }
    }
}

fn validate(email: &str, password: &SecretString) -> Result<Email, ValidationError> {
    let email = validation::email(email)?;
    if password.expose_secret().is_empty() {
        return Err(ValidationError::Required("password"));
    }
    Ok(email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use url::Url;

    use crate::api::ApiClient;
    use crate::storage::{LocalStorage, keys};

    fn session() -> (SessionStore, LocalStorage) {
        let storage = LocalStorage::in_memory();
        // Nothing listens on port 9
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap());
        (SessionStore::new(api, storage.clone()), storage)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_locally() {
        let (session, _) = session();
        let mut flow = LoginFlow::new(&session);

        let next = flow.submit(&session, "not-an-email", &secret("x")).await;
        assert_eq!(next, Route::Login);
        assert!(matches!(
            flow.error(),
            Some(AuthError::Validation(ValidationError::InvalidEmail(_)))
        ));
        assert!(flow.can_submit());

        flow.submit(&session, "a@b.com", &secret("")).await;
        assert!(matches!(
            flow.error(),
            Some(AuthError::Validation(ValidationError::Required("password")))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_reenables_submit() {
        let (session, _) = session();
        let mut flow = LoginFlow::new(&session);

        let next = flow.submit(&session, "a@b.com", &secret("x")).await;
        assert_eq!(next, Route::Login);
        assert!(matches!(flow.error(), Some(AuthError::Api(_))));
        assert!(flow.can_submit());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_existing_session_starts_authenticated() {
        let (session, storage) = session();
        storage.set(keys::ACCESS_TOKEN, "t1").unwrap();

        let flow = LoginFlow::new(&session);
        assert!(matches!(flow.state(), LoginState::Authenticated));
        assert!(!flow.can_submit());
        assert_eq!(flow.next_route(), Route::Home);
    }

    #[test]
    fn test_unknown_user_points_to_register() {
        let flow = LoginFlow {
            state: LoginState::Anonymous {
                error: Some(AuthError::UserNotFound),
            },
        };
        assert_eq!(flow.next_route(), Route::Register);
    }
}
