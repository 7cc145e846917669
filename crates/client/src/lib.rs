//! Meal Planner client library.
//!
//! Client-side state for the meal planner storefront: the bearer-token
//! session, the premium subscription gate, the in-memory cart, and typed
//! access to the external recipe catalog.
//!
//! # Architecture
//!
//! - [`storage::LocalStorage`] - string key-value file holding the token and theme
//! - [`services::auth::SessionStore`] - login/logout, token lifecycle
//! - [`services::premium::PremiumGate`] - subscription status, purchase, fail-closed check
//! - [`models::cart::Cart`] - append-or-merge cart with a derived total
//! - [`catalog::MealDbClient`] - search, category, ingredient, and by-id lookups
//! - [`routes`] - page table, access guards, login flow, menu, weekly plan
//! - [`state::AppState`] - owns all of the above for one process

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;

pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use state::AppState;
