//! Application state shared across the client.
//!
//! # Lifecycle
//!
//! - [`AppState::new`] opens local storage and builds every service; no
//!   request is made
//! - [`AppState::start`] loads the premium flag if a session exists
//! - [`AppState::logout`] deletes the token, clears the premium flag and
//!   empties the cart; the theme survives
//!
//! Dropping the last clone releases everything. Nothing needs flushing:
//! storage writes go straight to disk.

use std::sync::{Arc, Mutex, PoisonError};

use crate::api::ApiClient;
use crate::catalog::MealDbClient;
use crate::config::ClientConfig;
use crate::models::Cart;
use crate::routes::{Access, Route, guards};
use crate::services::{AccountService, AuthError, PremiumGate, SessionStore, ThemeStore};
use crate::storage::{LocalStorage, StorageError};

/// Application state shared across the client.
///
/// This struct is cheaply cloneable via `Arc` and provides access to every
/// service and the cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    storage: LocalStorage,
    session: SessionStore,
    premium: PremiumGate,
    accounts: AccountService,
    catalog: MealDbClient,
    theme: ThemeStore,
    cart: Mutex<Cart>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("storage", &self.inner.storage)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create the state with file-backed storage at `config.storage_path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing storage file cannot be read.
    pub fn new(config: ClientConfig) -> Result<Self, StorageError> {
        let storage = LocalStorage::open(&config.storage_path)?;
        Ok(Self::with_storage(config, storage))
    }

    /// Create the state over an existing storage handle.
    #[must_use]
    pub fn with_storage(config: ClientConfig, storage: LocalStorage) -> Self {
        let api = ApiClient::new(config.api_url.clone());
        let catalog = MealDbClient::new(config.mealdb_url.clone());
        let session = SessionStore::new(api.clone(), storage.clone());
        let premium = PremiumGate::new(api.clone(), session.clone());
        let accounts = AccountService::new(api, session.clone());
        let theme = ThemeStore::new(storage.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                session,
                premium,
                accounts,
                catalog,
                theme,
                cart: Mutex::new(Cart::new()),
            }),
        }
    }

    /// Load the premium flag for an existing session.
    pub async fn start(&self) {
        self.inner.premium.load_status().await;
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be deleted.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.inner.session.logout()?;
        self.inner.premium.reset();
        self.with_cart(Cart::clear);
        Ok(())
    }

    /// Decide whether `route` may be entered.
    pub async fn navigate(&self, route: Route) -> Access {
        guards::evaluate(route, &self.inner.session, &self.inner.premium).await
    }

    /// Run `f` with the cart locked. Do not hold the result across an await.
    pub fn with_cart<T>(&self, f: impl FnOnce(&mut Cart) -> T) -> T {
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn storage(&self) -> &LocalStorage {
        &self.inner.storage
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn premium(&self) -> &PremiumGate {
        &self.inner.premium
    }

    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    #[must_use]
    pub fn catalog(&self) -> &MealDbClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }
}
