//! Meal Planner Core - Shared types library.
//!
//! This crate provides common types used across all meal planner components:
//! - `client` - Session, premium gate, cart and recipe catalog access
//! - `cli` - Command-line front end over the client
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles and themes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
