//! Account services: registration, user lookups, profile and settings.

use meal_planner_core::{Email, UserId, UserRole};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::types::{
    CreateUserRequest, ProfileUpdate, SettingsUpdate, User, UserProfile, UserSettings, UserUpdate,
};
use crate::api::{ApiClient, ApiError};
use crate::error::add_breadcrumb;
use crate::services::auth::SessionStore;
use crate::validation::{self, ValidationError};

/// Shown when registration fails without a server message.
pub const GENERIC_REGISTRATION_FAILURE: &str = "Error registering the user";

/// Errors that can occur in account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A form field is invalid. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation needs a session and there is none.
    #[error("not logged in")]
    NotAuthenticated,

    /// The backend rejected the registration.
    #[error("{}", registration_message(.message))]
    Registration {
        message: Option<String>,
        #[source]
        source: ApiError,
    },

    /// A write operation failed.
    #[error("failed to {operation}")]
    Write {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    /// A read operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[allow(clippy::ref_option)]
fn registration_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(GENERIC_REGISTRATION_FAILURE)
}

/// A validated registration form.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: Email,
    pub password: SecretString,
    pub role: UserRole,
}

impl NewUser {
    /// Validate a registration form. All fields are required.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank field or a malformed email.
    pub fn new(
        username: &str,
        full_name: &str,
        email: &str,
        password: &SecretString,
        role: UserRole,
    ) -> Result<Self, ValidationError> {
        let username = validation::required("username", username)?.to_string();
        let full_name = validation::required("full name", full_name)?.to_string();
        let email = validation::email(email)?;
        if password.expose_secret().is_empty() {
            return Err(ValidationError::Required("password"));
        }

        Ok(Self {
            username,
            full_name,
            email,
            password: password.clone(),
            role,
        })
    }
}

/// Account service.
#[derive(Debug, Clone)]
pub struct AccountService {
    api: ApiClient,
    session: SessionStore,
}

impl AccountService {
    /// Create an account service.
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    // =========================================================================
    // Registration & users
    // =========================================================================

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Registration` carrying the backend's message if
    /// it rejects the account.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &NewUser) -> Result<(), AccountError> {
        let body = CreateUserRequest {
            username: &user.username,
            full_name: &user.full_name,
            email: user.email.as_str(),
            password: user.password.expose_secret(),
            rol: user.role,
        };

        self.api
            .send_ignoring_body(Method::POST, &["createUser"], Some(&body), None)
            .await
            .map_err(|source| AccountError::Registration {
                message: source.server_message().map(str::to_string),
                source,
            })?;

        add_breadcrumb("auth", "User registered", None);
        info!("Registered new account");
        Ok(())
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Api` if the request fails, including a 404.
    #[instrument(skip(self))]
    pub async fn user_by_email(&self, email: &Email) -> Result<User, AccountError> {
        Ok(self.api.get(&["users", "email", email.as_str()], None).await?)
    }

    /// Look up a user by username. `None` if there is no such user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Api` if the request fails with anything but 404.
    #[instrument(skip(self))]
    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        match self.api.get(&["users", "username", username], None).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn user(&self, id: UserId) -> Result<User, AccountError> {
        Ok(self.api.get(&["users", &id.to_string()], None).await?)
    }

    /// All registered users.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, AccountError> {
        Ok(self.api.get(&["usuarios"], None).await?)
    }

    /// Change a user's username and/or password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Write` if the backend rejects the change.
    #[instrument(skip(self, update))]
    pub async fn edit_user(&self, id: UserId, update: &UserUpdate) -> Result<(), AccountError> {
        self.api
            .send_ignoring_body(Method::PATCH, &["usuarios", &id.to_string()], Some(update), None)
            .await
            .map_err(|source| AccountError::Write {
                operation: "edit the user",
                source,
            })
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Write` if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), AccountError> {
        self.api
            .send_ignoring_body::<()>(Method::DELETE, &["usuarios", &id.to_string()], None, None)
            .await
            .map_err(|source| AccountError::Write {
                operation: "delete the user",
                source,
            })
    }

    // =========================================================================
    // Profile & settings
    // =========================================================================

    /// Profile of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotAuthenticated` without a session or
    /// `AccountError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, AccountError> {
        let token = self.bearer()?;
        Ok(self.api.get(&["api", "user", "profile"], Some(&token)).await?)
    }

    /// Update the logged-in user's profile. Only set fields are sent.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotAuthenticated` without a session or
    /// `AccountError::Write` if the backend rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AccountError> {
        let token = self.bearer()?;
        self.api
            .send(Method::PUT, &["api", "user", "profile"], update, Some(&token))
            .await
            .map_err(|source| AccountError::Write {
                operation: "update the profile",
                source,
            })
    }

    /// Settings of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotAuthenticated` without a session or
    /// `AccountError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<UserSettings, AccountError> {
        let token = self.bearer()?;
        Ok(self.api.get(&["api", "user", "settings"], Some(&token)).await?)
    }

    /// Update the logged-in user's settings. Only set fields are sent.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotAuthenticated` without a session or
    /// `AccountError::Write` if the backend rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, AccountError> {
        let token = self.bearer()?;
        self.api
            .send(Method::PUT, &["api", "user", "settings"], update, Some(&token))
            .await
            .map_err(|source| AccountError::Write {
                operation: "save the settings",
                source,
            })
    }

    fn bearer(&self) -> Result<SecretString, AccountError> {
        self.session.bearer().ok_or(AccountError::NotAuthenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_new_user_requires_every_field() {
        let password = secret("hunter22");
        assert_eq!(
            NewUser::new(" ", "Ana B", "a@b.com", &password, UserRole::User).unwrap_err(),
            ValidationError::Required("username")
        );
        assert_eq!(
            NewUser::new("ana", "", "a@b.com", &password, UserRole::User).unwrap_err(),
            ValidationError::Required("full name")
        );
        assert!(matches!(
            NewUser::new("ana", "Ana B", "not-an-email", &password, UserRole::User),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert_eq!(
            NewUser::new("ana", "Ana B", "a@b.com", &secret(""), UserRole::User).unwrap_err(),
            ValidationError::Required("password")
        );
    }

    #[test]
    fn test_new_user_trims_fields() {
        let user =
            NewUser::new(" ana ", " Ana B ", "a@b.com", &secret("pw"), UserRole::default()).unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(user.full_name, "Ana B");
        assert_eq!(user.role, UserRole::User);
        assert!(!format!("{user:?}").contains("\"pw\""));
    }

    #[test]
    fn test_registration_error_message() {
        let with_message = AccountError::Registration {
            message: Some("El email ya existe".to_string()),
            source: ApiError::Status {
                status: 409,
                message: Some("El email ya existe".to_string()),
            },
        };
        assert_eq!(with_message.to_string(), "El email ya existe");

        let bare = AccountError::Registration {
            message: None,
            source: ApiError::Status {
                status: 500,
                message: None,
            },
        };
        assert_eq!(bare.to_string(), GENERIC_REGISTRATION_FAILURE);
    }
}
