//! Core types for the meal planner.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod preferences;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use preferences::*;
pub use price::{CurrencyCode, Price};
