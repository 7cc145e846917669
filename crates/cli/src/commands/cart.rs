//! Order command.
//!
//! The cart lives in memory, so one `order` run fills it, shows it and checks
//! out. Nothing is sent to the backend.

use meal_planner_client::models::CartLine;
use meal_planner_client::routes::Route;
use meal_planner_client::routes::cart::{self, CartView};
use meal_planner_client::{AppError, AppState};

use super::{OrderItem, require};

/// Add each item to the cart, then check out.
pub async fn order(state: &AppState, items: &[OrderItem]) -> Result<(), AppError> {
    require(state, Route::Cart).await?;

    for item in items {
        let meal = state.catalog().by_id(&item.id).await?;
        let line = CartLine::for_meal(meal, item.quantity)?;
        state.with_cart(|cart| cart.add(line));
    }

    let view = state.with_cart(|cart| CartView::from(&*cart));
    tracing::info!("Cart ({} items):", view.item_count);
    for item in &view.items {
        tracing::info!(
            "  {} x {} @ {} = {}",
            item.quantity,
            item.name,
            item.price,
            item.line_price
        );
    }

    let confirmation = state.with_cart(cart::purchase);
    tracing::info!("Purchase complete. Total: {}", confirmation.total);
    Ok(())
}
