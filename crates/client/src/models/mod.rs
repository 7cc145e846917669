//! Client-side domain models.

pub mod cart;

pub use cart::{Cart, CartError, CartLine, Receipt, unit_price_for};
