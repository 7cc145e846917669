//! Recipe commands: search, category, show, menu and the weekly plan.

use meal_planner_client::catalog::Meal;
use meal_planner_client::routes::Route;
use meal_planner_client::routes::menu::{default_menu, load_menu};
use meal_planner_client::routes::plan::{self, PlanRequest};
use meal_planner_client::{AppError, AppState};
use meal_planner_core::MealId;

use super::require;

fn list(meals: &[Meal]) {
    if meals.is_empty() {
        tracing::info!("No recipes found");
    }
    for meal in meals {
        tracing::info!("{:>8}  {}", meal.id.as_str(), meal.name);
    }
}

pub async fn search(state: &AppState, text: &str) -> Result<(), AppError> {
    let meals = state.catalog().search(text).await?;
    list(&meals);
    Ok(())
}

pub async fn category(state: &AppState, name: &str) -> Result<(), AppError> {
    let meals = state.catalog().by_category(name).await?;
    list(&meals);
    Ok(())
}

/// Show a recipe with its ingredients and instructions.
pub async fn show(state: &AppState, id: String) -> Result<(), AppError> {
    let meal = state.catalog().by_id(&MealId::new(id)).await?;

    tracing::info!("{} ({})", meal.name, meal.id);
    let origin: Vec<&str> = [meal.category.as_deref(), meal.area.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !origin.is_empty() {
        tracing::info!("{}", origin.join(", "));
    }

    let tags: Vec<&str> = meal.tag_list().collect();
    if !tags.is_empty() {
        tracing::info!("Tags: {}", tags.join(", "));
    }

    tracing::info!("Ingredients:");
    for ingredient in &meal.ingredients {
        if ingredient.measure.is_empty() {
            tracing::info!("  - {}", ingredient.name);
        } else {
            tracing::info!("  - {} ({})", ingredient.name, ingredient.measure);
        }
    }

    if let Some(instructions) = &meal.instructions {
        tracing::info!("Instructions:");
        for line in instructions.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!("  {}", line.trim());
        }
    }
    if let Some(youtube) = &meal.youtube {
        tracing::info!("Video: {youtube}");
    }
    Ok(())
}

/// Show every menu section. A failed section is listed with its error.
pub async fn menu(state: &AppState) -> Result<(), AppError> {
    require(state, Route::Menu).await?;

    for section in load_menu(state.catalog(), &default_menu()).await {
        tracing::info!("== {} ==", section.title);
        match &section.error {
            Some(error) => tracing::info!("  (unavailable: {error})"),
            None => list(&section.meals),
        }
    }
    Ok(())
}

/// Generate a weekly plan for a premium user.
pub async fn plan(
    state: &AppState,
    preference: &str,
    calories: u32,
    meals: u32,
) -> Result<(), AppError> {
    let request = PlanRequest::new(calories, meals, preference)?;
    require(state, Route::PersonalizedPlan).await?;

    let plan = plan::generate(state.catalog(), &request).await?;

    tracing::info!(
        "Weekly plan ({}, {} kcal/day, {} meals/day)",
        plan.category,
        request.calories_per_day,
        request.meals_per_day
    );
    for day in &plan.days {
        tracing::info!("{}: {} ({})", day.day, day.meal.name, day.meal.id);
    }
    Ok(())
}
