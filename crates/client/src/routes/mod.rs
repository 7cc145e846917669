//! Pages and the flows behind them.
//!
//! # Route Structure
//!
//! ```text
//! /register            - Create an account (anonymous only)
//! /login               - Log in (anonymous only)
//! /home                - Landing page (auth)
//! /menu                - Meal sections (auth)
//! /cart                - Cart and checkout (auth)
//! /premium/plans       - Subscription plans (auth)
//! /premium/features    - Premium content (auth + premium)
//! /personalized-plan   - Weekly plan generator (auth + premium)
//! /profile             - Profile (auth)
//! /settings            - Settings (auth)
//! /contact             - Contact (public)
//! ```

pub mod cart;
pub mod guards;
pub mod login;
pub mod menu;
pub mod plan;

pub use guards::{Access, AuthGuard, PremiumGuard};

use thiserror::Error;

/// A path that names no page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown page: {0}")]
pub struct UnknownRoute(pub String);

/// Which guards a page needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone.
    Public,
    /// Only visitors without a session; others go home.
    Anonymous,
    /// A session.
    Authenticated,
    /// A session and a premium subscription.
    Premium,
}

/// A page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Register,
    Login,
    Home,
    Menu,
    Cart,
    PremiumPlans,
    PremiumFeatures,
    PersonalizedPlan,
    Profile,
    Settings,
    Contact,
}

impl Route {
    /// Every page, in navigation order.
    pub const ALL: [Self; 11] = [
        Self::Register,
        Self::Login,
        Self::Home,
        Self::Menu,
        Self::Cart,
        Self::PremiumPlans,
        Self::PremiumFeatures,
        Self::PersonalizedPlan,
        Self::Profile,
        Self::Settings,
        Self::Contact,
    ];

    /// The page shown for the empty path.
    pub const DEFAULT: Self = Self::Register;

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::Login => "/login",
            Self::Home => "/home",
            Self::Menu => "/menu",
            Self::Cart => "/cart",
            Self::PremiumPlans => "/premium/plans",
            Self::PremiumFeatures => "/premium/features",
            Self::PersonalizedPlan => "/personalized-plan",
            Self::Profile => "/profile",
            Self::Settings => "/settings",
            Self::Contact => "/contact",
        }
    }

    #[must_use]
    pub const fn requirement(self) -> Requirement {
        match self {
            Self::Register | Self::Login => Requirement::Anonymous,
            Self::Contact => Requirement::Public,
            Self::PremiumFeatures | Self::PersonalizedPlan => Requirement::Premium,
            Self::Home
            | Self::Menu
            | Self::Cart
            | Self::PremiumPlans
            | Self::Profile
            | Self::Settings => Requirement::Authenticated,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Route {
    type Err = UnknownRoute;

    /// Parse a path. The leading and trailing slashes are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::DEFAULT);
        }

        Self::ALL
            .into_iter()
            .find(|route| route.path().trim_start_matches('/') == trimmed)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        assert_eq!("/premium/plans".parse::<Route>().unwrap(), Route::PremiumPlans);
        assert_eq!("menu".parse::<Route>().unwrap(), Route::Menu);
        assert_eq!("/cart/".parse::<Route>().unwrap(), Route::Cart);
        assert_eq!("".parse::<Route>().unwrap(), Route::Register);
        assert_eq!(
            "/admin".parse::<Route>().unwrap_err(),
            UnknownRoute("/admin".to_string())
        );
    }

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
    }

    #[test]
    fn test_requirements() {
        assert_eq!(Route::Login.requirement(), Requirement::Anonymous);
        assert_eq!(Route::Contact.requirement(), Requirement::Public);
        assert_eq!(Route::PremiumPlans.requirement(), Requirement::Authenticated);
        assert_eq!(Route::PersonalizedPlan.requirement(), Requirement::Premium);
    }
}
