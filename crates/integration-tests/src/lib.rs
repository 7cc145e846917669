//! Integration tests for the meal planner client.
//!
//! Every test runs the real client against two fake HTTP services bound to
//! `127.0.0.1:0`: the auth/subscription/profile backend and the recipe
//! catalog. Nothing outside the process is contacted.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p meal-planner-integration-tests
//! ```
//!
//! # Fixtures
//!
//! - [`backend::FakeBackend`] - accepts [`TEST_EMAIL`] / [`TEST_PASSWORD`] and issues [`TEST_TOKEN`]
//! - [`mealdb::FakeMealDb`] - a small generated catalog with per-category failure injection
//! - [`TestApp`] - an [`AppState`] wired to both, with file storage in a temporary directory

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod mealdb;

use std::path::{Path, PathBuf};

use meal_planner_client::{AppState, ClientConfig};
use meal_planner_core::Email;
use secrecy::SecretString;
use tempfile::TempDir;

use backend::FakeBackend;
use mealdb::FakeMealDb;

/// Email accepted by the fake backend.
pub const TEST_EMAIL: &str = "a@b.com";

/// Password accepted for [`TEST_EMAIL`].
pub const TEST_PASSWORD: &str = "x";

/// Token issued for a successful login.
pub const TEST_TOKEN: &str = "t1";

/// Bind a router to an ephemeral local port and serve it in the background.
///
/// Returns `http://127.0.0.1:<port>`.
pub(crate) async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener
        .local_addr()
        .expect("Failed to read test listener address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    format!("http://{addr}")
}

/// The client wired to fresh fake services.
pub struct TestApp {
    pub state: AppState,
    pub backend: FakeBackend,
    pub mealdb: FakeMealDb,
    storage_dir: TempDir,
}

impl TestApp {
    /// Start both fakes and build the client state over a new storage file.
    pub async fn start() -> Self {
        let backend = FakeBackend::start().await;
        let mealdb = FakeMealDb::start().await;
        let storage_dir = TempDir::new().expect("Failed to create test storage dir");

        let state = AppState::new(Self::config(
            &backend,
            &mealdb,
            &Self::storage_file(&storage_dir),
        ))
        .expect("Failed to open test storage");

        Self {
            state,
            backend,
            mealdb,
            storage_dir,
        }
    }

    /// A second client over the same storage file, as after a restart.
    pub fn reopen(&self) -> AppState {
        AppState::new(Self::config(
            &self.backend,
            &self.mealdb,
            &self.storage_path(),
        ))
        .expect("Failed to reopen test storage")
    }

    /// Log in with the test account.
    pub async fn login(&self) {
        self.state
            .session()
            .login(
                &Email::parse(TEST_EMAIL).expect("Invalid test email"),
                &secret(TEST_PASSWORD),
            )
            .await
            .expect("Test login failed");
    }

    /// The storage file shared by [`state`](Self::state) and [`reopen`](Self::reopen).
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        Self::storage_file(&self.storage_dir)
    }

    fn storage_file(dir: &TempDir) -> PathBuf {
        dir.path().join("storage.json")
    }

    fn config(backend: &FakeBackend, mealdb: &FakeMealDb, storage_path: &Path) -> ClientConfig {
        ClientConfig::for_endpoints(backend.url(), mealdb.url(), storage_path)
            .expect("Invalid test endpoints")
    }
}

/// Wrap a test password.
#[must_use]
pub fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}
