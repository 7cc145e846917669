//! Fake auth, subscription and profile backend.
//!
//! # Routes
//!
//! ```text
//! POST /login                  - TEST_EMAIL / TEST_PASSWORD -> TEST_TOKEN
//! POST /createUser             - fails for taken@b.com
//! GET  /users/email/{email}    - the test account only
//! GET  /api/user/status        - bearer; premium flag is settable
//! GET  /api/plans              - two fixed plans
//! POST /api/purchase           - bearer; known plans only, sets premium
//! GET  /api/user/profile       - bearer
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::{TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN, serve};

/// An email the backend treats as already registered.
pub const TAKEN_EMAIL: &str = "taken@b.com";

/// Plan IDs the backend sells.
pub const PLAN_IDS: [&str; 2] = ["monthly", "yearly"];

type Reply = (StatusCode, Json<Value>);

#[derive(Default)]
struct BackendState {
    premium: AtomicBool,
    status_fails: AtomicBool,
    status_requests: AtomicUsize,
    purchases: Mutex<Vec<String>>,
}

/// Handle to a running fake backend.
pub struct FakeBackend {
    url: String,
    state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());

        let router = Router::new()
            .route("/login", post(login))
            .route("/createUser", post(create_user))
            .route("/users/email/{email}", get(user_by_email))
            .route("/api/user/status", get(status))
            .route("/api/plans", get(plans))
            .route("/api/purchase", post(purchase))
            .route("/api/user/profile", get(profile))
            .with_state(state.clone());

        Self {
            url: serve(router).await,
            state,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the test account's subscription.
    pub fn set_premium(&self, premium: bool) {
        self.state.premium.store(premium, Ordering::SeqCst);
    }

    /// Make the status endpoint answer 500.
    pub fn fail_status(&self, fail: bool) {
        self.state.status_fails.store(fail, Ordering::SeqCst);
    }

    /// Requests received by the status endpoint so far.
    #[must_use]
    pub fn status_requests(&self) -> usize {
        self.state.status_requests.load(Ordering::SeqCst)
    }

    /// Plans bought so far, in order.
    #[must_use]
    pub fn purchases(&self) -> Vec<String> {
        self.state
            .purchases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn message(status: StatusCode, text: &str) -> Reply {
    reply(status, json!({ "message": text }))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> Reply {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password_hash"].as_str().unwrap_or_default();

    if email != TEST_EMAIL {
        return message(StatusCode::NOT_FOUND, "Usuario no encontrado");
    }
    if password != TEST_PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Contraseña incorrecta");
    }
    reply(StatusCode::OK, json!({ "access_token": TEST_TOKEN }))
}

async fn create_user(Json(body): Json<Value>) -> Reply {
    if body["email"].as_str() == Some(TAKEN_EMAIL) {
        return message(StatusCode::BAD_REQUEST, "El correo ya está registrado");
    }
    message(StatusCode::CREATED, "Usuario creado")
}

async fn user_by_email(Path(email): Path<String>) -> Reply {
    if email != TEST_EMAIL {
        return message(StatusCode::NOT_FOUND, "Usuario no encontrado");
    }
    reply(
        StatusCode::OK,
        json!({
            "user_id": 1,
            "email": TEST_EMAIL,
            "username": "ana",
            "full_name": "Ana Diaz",
            "password_hash": "ignored",
            "roles": "user",
        }),
    )
}

async fn status(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Reply {
    state.status_requests.fetch_add(1, Ordering::SeqCst);

    if state.status_fails.load(Ordering::SeqCst) {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Error interno");
    }
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token inválido");
    }

    let premium = state.premium.load(Ordering::SeqCst);
    let plan = premium.then_some("monthly");
    reply(StatusCode::OK, json!({ "premium": premium, "plan": plan }))
}

async fn plans() -> Reply {
    reply(
        StatusCode::OK,
        json!([
            {
                "id": "monthly",
                "name": "Mensual",
                "price": 9.5,
                "benefits": ["Plan personalizado", "Recetas premium"],
            },
            { "id": "yearly", "name": "Anual", "price": 95.0 },
        ]),
    )
}

async fn purchase(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token inválido");
    }

    let Some(plan) = body["plan"].as_str().filter(|p| PLAN_IDS.contains(p)) else {
        return message(StatusCode::BAD_REQUEST, "Plan no válido");
    };

    state
        .purchases
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(plan.to_string());
    state.premium.store(true, Ordering::SeqCst);

    message(StatusCode::OK, "Compra realizada")
}

async fn profile(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token inválido");
    }
    reply(
        StatusCode::OK,
        json!({
            "user_id": 1,
            "username": "ana",
            "email": TEST_EMAIL,
            "full_name": "Ana Diaz",
            "rol": "user",
        }),
    )
}
