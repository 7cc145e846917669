//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Message the backend sends for a wrong password.
pub const WRONG_PASSWORD_MESSAGE: &str = "Contraseña incorrecta";

/// Message the backend sends for an unknown email.
pub const USER_NOT_FOUND_MESSAGE: &str = "Usuario no encontrado";

/// Shown when a failed login carries no message.
pub const GENERIC_LOGIN_FAILURE: &str = "An error occurred while logging in";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login form is incomplete or malformed. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The password does not match.
    #[error("wrong password")]
    WrongPassword,

    /// No account with this email; the user may want to register.
    #[error("user not found")]
    UserNotFound,

    /// The backend rejected the login with some other message.
    #[error("{0}")]
    Rejected(String),

    /// The backend rejected the login without a usable message.
    #[error("An error occurred while logging in")]
    Failed,

    /// The backend accepted the login but sent no token.
    #[error("login response did not include an access token")]
    MissingToken,

    /// Transport or protocol failure talking to the backend.
    #[error("backend error: {0}")]
    Api(#[source] ApiError),

    /// Reading or writing the stored token failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Classify a failed login response.
    ///
    /// The two known backend messages get their own variants; any other
    /// message is carried verbatim. Transport and parse failures stay `Api`.
    #[must_use]
    pub fn from_login_failure(err: ApiError) -> Self {
        match err {
            ApiError::Status { message, .. } => match message.as_deref() {
                Some(WRONG_PASSWORD_MESSAGE) => Self::WrongPassword,
                Some(USER_NOT_FOUND_MESSAGE) => Self::UserNotFound,
                Some(other) => Self::Rejected(other.to_string()),
                None => Self::Failed,
            },
            other => Self::Api(other),
        }
    }

    /// True if the user should be offered registration.
    #[must_use]
    pub const fn suggests_registration(&self) -> bool {
        matches!(self, Self::UserNotFound)
    }
}
