//! HTTP client for the meal planner backend.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - The backend is the source of truth - no local sync, direct API calls
//! - Bearer authentication with the session token where an endpoint needs it
//! - Error bodies are `{ "message": "..." }`; the message is kept verbatim
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /login`, `POST /createUser`
//! - `GET /users/email/{email}`, `GET /users/username/{name}`, `GET /users/{id}`
//! - `GET /usuarios`, `PATCH /usuarios/{id}`, `DELETE /usuarios/{id}`
//!
//! ## Subscription
//! - `GET /api/plans`, `POST /api/purchase`, `GET /api/user/status`
//!
//! ## Profile & settings
//! - `GET/PUT /api/user/profile`, `GET/PUT /api/user/settings`

pub mod types;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use types::ErrorBody;

/// Maximum number of response body characters copied into logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{}", format_status_error(.status, .message))]
    Status {
        status: u16,
        /// The `message` field of the error body, if there was one.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The backend's error message, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn format_status_error(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("HTTP {status}"),
    }
}

/// Client for the meal planner backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Build an absolute URL from path segments. Segments are percent-encoded.
    #[must_use]
    pub fn url(&self, segments: &[&str]) -> Url {
        endpoint(&self.inner.base_url, segments)
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or a body
    /// that does not parse as `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        bearer: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, segments, bearer);
        let body = self.execute(request).await?;
        parse_body(&body)
    }

    /// Send a JSON body and parse a JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or a body
    /// that does not parse as `T`.
    pub async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = self.request(method, segments, bearer).json(body);
        let body = self.execute(request).await?;
        parse_body(&body)
    }

    /// Send a request whose success body is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    pub async fn send_ignoring_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        bearer: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        let mut request = self.request(method, segments, bearer);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await.map(drop)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        bearer: Option<&SecretString>,
    ) -> RequestBuilder {
        let request = self.inner.client.request(method, self.url(segments));
        match bearer {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response.
    #[instrument(skip(self, request))]
    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_owned();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                path = %url,
                body = %truncate(&body),
                "Backend returned non-success status"
            );
            return Err(status_error(status, &body));
        }

        Ok(body)
    }
}

/// Join path segments onto a base URL.
///
/// Base URLs are validated at configuration time, so the cannot-be-a-base
/// case only leaves the URL unchanged.
#[must_use]
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(body),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
