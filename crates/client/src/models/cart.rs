//! Shopping cart.
//!
//! An in-memory list of meals with quantities. Lines are keyed by meal id:
//! adding a meal that is already in the cart sums the quantities instead of
//! appending a second line. There is no remove-line or edit-quantity
//! operation; the cart is only ever cleared as a whole.

use std::num::NonZeroU32;

use meal_planner_core::MealId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::Meal;

/// Lowest price of any meal.
pub const MIN_UNIT_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Price per listed ingredient (1.5).
pub const PRICE_PER_INGREDIENT: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Highest unit price a line accepts.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors from building cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("unit price {0} must be between 0 and 1000000")]
    InvalidPrice(Decimal),
}

/// Unit price of a meal: 1.5 per ingredient, never below 5.
#[must_use]
pub fn unit_price_for(meal: &Meal) -> Decimal {
    let by_ingredients = Decimal::from(meal.ingredients.len()) * PRICE_PER_INGREDIENT;
    by_ingredients.max(MIN_UNIT_PRICE)
}

/// One meal in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub meal: Meal,
    pub quantity: NonZeroU32,
    pub unit_price: Decimal,
}

impl CartLine {
    /// Create a line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ZeroQuantity` if `quantity` is 0 and
    /// `CartError::InvalidPrice` if `unit_price` is negative or above
    /// [`MAX_UNIT_PRICE`].
    pub fn new(meal: Meal, quantity: u32, unit_price: Decimal) -> Result<Self, CartError> {
        let quantity = NonZeroU32::new(quantity).ok_or(CartError::ZeroQuantity)?;
        if unit_price.is_sign_negative() || unit_price > MAX_UNIT_PRICE {
            return Err(CartError::InvalidPrice(unit_price));
        }
        Ok(Self {
            meal,
            quantity,
            unit_price,
        })
    }

    /// Create a line priced with [`unit_price_for`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::ZeroQuantity` if `quantity` is 0.
    pub fn for_meal(meal: Meal, quantity: u32) -> Result<Self, CartError> {
        let unit_price = unit_price_for(&meal);
        Self::new(meal, quantity, unit_price)
    }

    /// The meal id this line is keyed by.
    #[must_use]
    pub const fn meal_id(&self) -> &MealId {
        &self.meal.id
    }

    /// Quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity.get()).saturating_mul(self.unit_price)
    }
}

/// What was bought at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

/// The cart.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line, merging it into an existing line for the same meal.
    ///
    /// A merged line keeps its original unit price.
    pub fn add(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.meal.id == line.meal.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity.get());
            }
            None => self.lines.push(line),
        }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantity times unit price over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.get())).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take every line and the total, leaving the cart empty.
    pub fn checkout(&mut self) -> Receipt {
        let total = self.total();
        Receipt {
            lines: std::mem::take(&mut self.lines),
            total,
        }
    }
}
