//! Cart page.
//!
//! Checkout is local only: it shows the total and empties the cart. No order
//! is sent anywhere.

use meal_planner_core::Price;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::error::add_breadcrumb;
use crate::models::{Cart, CartLine, Receipt};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: format_price(Decimal::ZERO),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Format an amount in the store currency, e.g. `€12.50`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    Price::from_amount(amount).display()
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.meal.id.to_string(),
            name: line.meal.name.clone(),
            thumbnail: line.meal.thumbnail.clone(),
            quantity: line.quantity.get(),
            price: format_price(line.unit_price),
            line_price: format_price(line.line_total()),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: format_price(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

/// What the user sees after checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseConfirmation {
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl From<&Receipt> for PurchaseConfirmation {
    fn from(receipt: &Receipt) -> Self {
        Self {
            items: receipt.lines.iter().map(CartItemView::from).collect(),
            total: format_price(receipt.total),
        }
    }
}

/// Check out: report the total and empty the cart.
#[instrument(skip(cart))]
pub fn purchase(cart: &mut Cart) -> PurchaseConfirmation {
    let receipt = cart.checkout();
    let confirmation = PurchaseConfirmation::from(&receipt);

    add_breadcrumb("cart", "Checked out", Some(&[("total", confirmation.total.as_str())]));
    info!(total = %confirmation.total, lines = receipt.lines.len(), "Checked out");

    confirmation
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::catalog::Meal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::empty();
        assert!(view.is_empty());
        assert_eq!(view.total, "€0.00");
        assert_eq!(view, CartView::from(&Cart::new()));
    }

    #[test]
    fn test_view_formats_prices() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(Meal::summary("52772", "Teriyaki"), 2, dec("7.5")).unwrap());

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "€15.00");
        assert_eq!(view.items[0].price, "€7.50");
        assert_eq!(view.items[0].line_price, "€15.00");
        assert_eq!(view.items[0].id, "52772");
    }

    #[test]
    fn test_purchase_clears_cart() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(Meal::summary("1", "A"), 1, dec("5")).unwrap());
        cart.add(CartLine::new(Meal::summary("2", "B"), 3, dec("6")).unwrap());

        let confirmation = purchase(&mut cart);
        assert_eq!(confirmation.total, "€23.00");
        assert_eq!(confirmation.items.len(), 2);
        assert!(cart.is_empty());
    }
}
