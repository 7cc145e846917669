//! Personalized weekly plan.
//!
//! The dietary preference picks one catalog category; the recipes in it are
//! dealt round-robin onto the seven weekdays, Monday first. Calories and
//! meals per day are validated but do not change the selection.

use chrono::Weekday;
use thiserror::Error;
use tracing::instrument;

use crate::catalog::{CatalogError, Meal, MealDbClient};
use crate::validation::{self, ValidationError};

/// Minimum recipes needed to fill a week without repeats.
pub const MIN_RECIPES: usize = 7;

/// Lowest accepted calories per day.
pub const MIN_CALORIES: u32 = 1000;

/// Accepted meals per day.
pub const MEALS_PER_DAY: (u32, u32) = (1, 10);

/// Days of a plan, in order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Errors from generating a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The category has fewer than [`MIN_RECIPES`] recipes.
    #[error("not enough recipes for this preference (found {found}, need 7)")]
    NotEnoughRecipes { found: usize },

    #[error("failed to load recipes: {0}")]
    Catalog(#[from] CatalogError),
}

/// A validated plan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub calories_per_day: u32,
    pub meals_per_day: u32,
    pub dietary_preference: String,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            calories_per_day: 2000,
            meals_per_day: 3,
            dietary_preference: "Sin restricciones".to_string(),
        }
    }
}

impl PlanRequest {
    /// Validate the plan form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if calories are below 1000, meals per day
    /// are outside 1..=10, or the preference is blank.
    pub fn new(
        calories_per_day: u32,
        meals_per_day: u32,
        dietary_preference: &str,
    ) -> Result<Self, ValidationError> {
        let calories_per_day =
            validation::at_least("calories per day", calories_per_day, MIN_CALORIES)?;
        let meals_per_day =
            validation::in_range("meals per day", meals_per_day, MEALS_PER_DAY.0, MEALS_PER_DAY.1)?;
        let dietary_preference =
            validation::required("dietary preference", dietary_preference)?.to_string();

        Ok(Self {
            calories_per_day,
            meals_per_day,
            dietary_preference,
        })
    }

    /// Catalog category for the preference.
    #[must_use]
    pub fn category(&self) -> &'static str {
        category_for(&self.dietary_preference)
    }
}

/// Map free-text dietary preference to a catalog category.
#[must_use]
pub fn category_for(preference: &str) -> &'static str {
    let preference = preference.to_lowercase();
    if preference.contains("vegan") {
        "Vegan"
    } else if preference.contains("vegetar") {
        "Vegetarian"
    } else {
        "Chicken"
    }
}

/// One day of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDay {
    pub day: Weekday,
    pub meal: Meal,
}

/// Seven days, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyPlan {
    pub category: &'static str,
    pub days: Vec<PlanDay>,
}

/// Deal recipes onto the week: day `i` gets recipe `i mod n`.
///
/// # Errors
///
/// Returns `PlanError::NotEnoughRecipes` for fewer than seven recipes.
pub fn assign_week(recipes: &[Meal]) -> Result<Vec<PlanDay>, PlanError> {
    if recipes.len() < MIN_RECIPES {
        return Err(PlanError::NotEnoughRecipes {
            found: recipes.len(),
        });
    }

    Ok(WEEK
        .iter()
        .zip(recipes.iter().cycle())
        .map(|(day, meal)| PlanDay {
            day: *day,
            meal: meal.clone(),
        })
        .collect())
}

/// Fetch the preference's category and build the week.
///
/// # Errors
///
/// Returns `PlanError::Catalog` if the recipes cannot be loaded or
/// `PlanError::NotEnoughRecipes` if there are too few.
#[instrument(skip(catalog))]
pub async fn generate(catalog: &MealDbClient, request: &PlanRequest) -> Result<WeeklyPlan, PlanError> {
    let category = request.category();
    let recipes = catalog.by_category(category).await?;
    let days = assign_week(&recipes)?;
    Ok(WeeklyPlan { category, days })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn meals(n: usize) -> Vec<Meal> {
        (0..n)
            .map(|i| Meal::summary(i.to_string(), format!("Meal {i}")))
            .collect()
    }

    #[test]
    fn test_category_for() {
        assert_eq!(category_for("Vegano estricto"), "Vegan");
        assert_eq!(category_for("vegan"), "Vegan");
        assert_eq!(category_for("Vegetariano"), "Vegetarian");
        assert_eq!(category_for("Sin restricciones"), "Chicken");
    }

    #[test]
    fn test_request_validation() {
        assert!(PlanRequest::new(2000, 3, "Sin restricciones").is_ok());
        assert!(matches!(
            PlanRequest::new(999, 3, "x"),
            Err(ValidationError::BelowMinimum { field: "calories per day", min: 1000 })
        ));
        assert!(PlanRequest::new(1000, 0, "x").is_err());
        assert!(PlanRequest::new(1000, 11, "x").is_err());
        assert!(PlanRequest::new(1000, 10, "x").is_ok());
        assert_eq!(
            PlanRequest::new(1000, 3, "  ").unwrap_err(),
            ValidationError::Required("dietary preference")
        );
    }

    #[test]
    fn test_week_uses_first_seven_in_order() {
        let days = assign_week(&meals(9)).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day, Weekday::Mon);
        assert_eq!(days[6].day, Weekday::Sun);
        let ids: Vec<_> = days.iter().map(|d| d.meal.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_exactly_seven() {
        let days = assign_week(&meals(7)).unwrap();
        assert_eq!(days[6].meal.id.as_str(), "6");
    }

    #[test]
    fn test_too_few_recipes() {
        assert!(matches!(
            assign_week(&meals(6)),
            Err(PlanError::NotEnoughRecipes { found: 6 })
        ));
        assert!(matches!(
            assign_week(&[]),
            Err(PlanError::NotEnoughRecipes { found: 0 })
        ));
    }

    #[test]
    fn test_default_request() {
        let request = PlanRequest::default();
        assert_eq!(request.category(), "Chicken");
        assert_eq!(request.meals_per_day, 3);
    }
}
