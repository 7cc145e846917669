//! CLI command implementations.
//!
//! Results are reported through `tracing` at info level, so they honor
//! `RUST_LOG` like everything else.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod premium;
pub mod session;

use meal_planner_client::routes::{Access, Route};
use meal_planner_client::{AppError, AppState};
use meal_planner_core::MealId;
use thiserror::Error;

/// One `order` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: MealId,
    pub quantity: u32,
}

/// A malformed `order` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderItemError {
    #[error("missing recipe ID")]
    MissingId,

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Parse `<id>` or `<id>:<quantity>`. The quantity defaults to 1.
///
/// # Errors
///
/// Returns `OrderItemError` for an empty ID or a quantity that is not a
/// positive integer.
pub fn parse_order_item(value: &str) -> Result<OrderItem, OrderItemError> {
    let (id, quantity) = match value.split_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| OrderItemError::InvalidQuantity(quantity.to_string()))?;
            (id, quantity)
        }
        None => (value, 1),
    };

    let id = id.trim();
    if id.is_empty() {
        return Err(OrderItemError::MissingId);
    }

    Ok(OrderItem {
        id: MealId::new(id),
        quantity,
    })
}

/// Run the page guards for `route` and turn a redirect into an error.
pub async fn require(state: &AppState, route: Route) -> Result<(), AppError> {
    match state.navigate(route).await {
        Access::Allow => Ok(()),
        Access::Redirect(Route::PremiumPlans) => Err(AppError::PremiumRequired),
        Access::Redirect(_) => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_item() {
        let item = parse_order_item("52772").unwrap();
        assert_eq!(item.id.as_str(), "52772");
        assert_eq!(item.quantity, 1);

        let item = parse_order_item("52772:3").unwrap();
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_parse_order_item_rejects_bad_input() {
        assert_eq!(parse_order_item(":2"), Err(OrderItemError::MissingId));
        assert_eq!(
            parse_order_item("52772:0"),
            Err(OrderItemError::InvalidQuantity("0".to_string()))
        );
        assert_eq!(
            parse_order_item("52772:x"),
            Err(OrderItemError::InvalidQuantity("x".to_string()))
        );
    }
}
