//! Business logic services.

pub mod account;
pub mod auth;
pub mod premium;
pub mod theme;

pub use account::{AccountError, AccountService, NewUser};
pub use auth::{AuthError, Session, SessionStore, TokenClaims};
pub use premium::{PremiumError, PremiumGate};
pub use theme::ThemeStore;
