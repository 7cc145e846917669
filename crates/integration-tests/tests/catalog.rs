//! Integration tests for recipe lookups, the menu and the weekly plan.

use meal_planner_client::catalog::CatalogError;
use meal_planner_client::routes::menu::{SectionConfig, SectionSource, default_menu, load_menu};
use meal_planner_client::routes::plan::{self, PlanError, PlanRequest};
use meal_planner_core::MealId;
use meal_planner_integration_tests::TestApp;

/// Day names as `chrono::Weekday` displays them.
const WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// =============================================================================
// Lookups
// =============================================================================

#[tokio::test]
async fn test_by_id_parses_full_record() {
    let app = TestApp::start().await;

    let meal = app
        .state
        .catalog()
        .by_id(&MealId::new("2007"))
        .await
        .expect("Lookup failed");

    assert_eq!(meal.name, "Vegetarian Dish 7");
    assert_eq!(meal.category.as_deref(), Some("Vegetarian"));
    assert_eq!(meal.ingredients.len(), 8);
    assert_eq!(meal.ingredients[0].name, "Chicken");
    assert_eq!(meal.ingredients[0].measure, "1 cup");
    assert_eq!(meal.youtube, None);
    assert_eq!(meal.tag_list().collect::<Vec<_>>(), vec!["Quick", "Test"]);
}

#[tokio::test]
async fn test_by_id_is_cached() {
    let app = TestApp::start().await;
    let id = MealId::new("1000");

    let first = app.state.catalog().by_id(&id).await.expect("Lookup failed");
    let second = app.state.catalog().by_id(&id).await.expect("Lookup failed");

    assert_eq!(first, second);
    assert_eq!(app.mealdb.lookups(), 1);
}

#[tokio::test]
async fn test_by_id_not_found() {
    let app = TestApp::start().await;

    let err = app
        .state
        .catalog()
        .by_id(&MealId::new("999999"))
        .await
        .expect_err("Unknown meal should fail");

    assert!(matches!(err, CatalogError::NotFound(ref id) if id.as_str() == "999999"));
}

#[tokio::test]
async fn test_search_and_filters() {
    let app = TestApp::start().await;
    let catalog = app.state.catalog();

    let found = catalog.search("seafood dish").await.expect("Search failed");
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|m| !m.ingredients.is_empty()));

    assert!(catalog.search("healthy").await.expect("Search failed").is_empty());

    let desserts = catalog.by_category("Dessert").await.expect("Filter failed");
    assert_eq!(desserts.len(), 2);
    assert!(desserts.iter().all(|m| m.ingredients.is_empty()));

    // Only meals with at least ten ingredients reach "Basil"
    let basil = catalog.by_ingredient("Basil").await.expect("Filter failed");
    assert!(basil.is_empty());
    let rice = catalog.by_ingredient("Rice").await.expect("Filter failed");
    assert!(!rice.is_empty());
}

#[tokio::test]
async fn test_failed_category_is_an_error() {
    let app = TestApp::start().await;
    app.mealdb.fail_category("Seafood");

    let err = app
        .state
        .catalog()
        .by_category("Seafood")
        .await
        .expect_err("Failing category should error");
    assert!(matches!(err, CatalogError::Status(500)));
}

// =============================================================================
// Menu
// =============================================================================

#[tokio::test]
async fn test_menu_with_one_failed_section_keeps_four_sections() {
    let app = TestApp::start().await;
    app.mealdb.fail_category("Seafood");

    let sections = load_menu(app.state.catalog(), &default_menu()).await;

    let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Healthy", "Seafood", "Vegetarian", "Desserts"]);

    assert!(!sections[0].failed());
    assert!(sections[0].meals.is_empty());
    assert!(sections[1].failed());
    assert!(sections[1].meals.is_empty());
    assert_eq!(sections[2].meals.len(), 8);
    assert_eq!(sections[3].meals.len(), 2);
}

#[tokio::test]
async fn test_custom_menu_sections() {
    let app = TestApp::start().await;
    let sections = [
        SectionConfig::new("With rice", SectionSource::Ingredient("Rice".into())),
        SectionConfig::new("Vegan", SectionSource::Category("Vegan".into())),
    ];

    let loaded = load_menu(app.state.catalog(), &sections).await;
    assert_eq!(loaded.len(), 2);
    assert!(loaded.iter().all(|s| !s.failed()));
    assert_eq!(loaded[1].meals.len(), 3);
}

// =============================================================================
// Weekly plan
// =============================================================================

#[tokio::test]
async fn test_vegetarian_plan() {
    let app = TestApp::start().await;
    let request = PlanRequest::new(1800, 3, "Vegetariano").expect("Invalid request");

    let plan = plan::generate(app.state.catalog(), &request)
        .await
        .expect("Plan failed");

    assert_eq!(plan.category, "Vegetarian");
    let days: Vec<_> = plan.days.iter().map(|d| d.day.to_string()).collect();
    assert_eq!(days, WEEK);
    let ids: Vec<_> = plan.days.iter().map(|d| d.meal.id.as_str()).collect();
    assert_eq!(ids, vec!["2000", "2001", "2002", "2003", "2004", "2005", "2006"]);
}

#[tokio::test]
async fn test_default_plan_uses_chicken() {
    let app = TestApp::start().await;

    let plan = plan::generate(app.state.catalog(), &PlanRequest::default())
        .await
        .expect("Plan failed");

    assert_eq!(plan.category, "Chicken");
    assert_eq!(plan.days.len(), 7);
}

#[tokio::test]
async fn test_plan_with_too_few_recipes() {
    let app = TestApp::start().await;
    let request = PlanRequest::new(2000, 3, "Vegano").expect("Invalid request");

    let err = plan::generate(app.state.catalog(), &request)
        .await
        .expect_err("Vegan has only three recipes");

    assert!(matches!(err, PlanError::NotEnoughRecipes { found: 3 }));
}
