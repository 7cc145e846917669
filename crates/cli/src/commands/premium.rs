//! Subscription commands.

use meal_planner_client::routes::Route;
use meal_planner_client::routes::cart::format_price;
use meal_planner_client::{AppError, AppState};

use super::require;

pub async fn status(state: &AppState) -> Result<(), AppError> {
    let status = state.premium().status().await?;

    if status.premium {
        tracing::info!(
            "Premium: yes (plan: {})",
            status.plan.as_deref().unwrap_or("unknown")
        );
    } else {
        tracing::info!("Premium: no");
    }
    Ok(())
}

/// List the plans offered by the backend.
pub async fn plans(state: &AppState) -> Result<(), AppError> {
    require(state, Route::PremiumPlans).await?;
    let plans = state.premium().plans().await?;

    if plans.is_empty() {
        tracing::info!("No plans available");
        return Ok(());
    }

    for plan in &plans {
        tracing::info!("{} ({}) - {}", plan.name, plan.id, format_price(plan.price));
        for benefit in &plan.benefits {
            tracing::info!("  - {benefit}");
        }
    }
    Ok(())
}

pub async fn purchase(state: &AppState, plan: &str) -> Result<(), AppError> {
    require(state, Route::PremiumPlans).await?;

    if let Err(e) = state.premium().purchase(plan).await {
        tracing::warn!("Purchase failed: {}", e.user_message());
        return Err(e.into());
    }

    tracing::info!("Subscribed to {plan}. Premium pages are now open.");
    Ok(())
}
