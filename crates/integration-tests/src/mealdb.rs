//! Fake recipe catalog speaking the `TheMealDB` v1 JSON format.
//!
//! The catalog is generated: each category holds a fixed number of meals,
//! and meal `n` of a category has `n + 1` ingredients.
//!
//! | Category   | Meals | IDs  |
//! |------------|-------|------|
//! | Chicken    | 7     | 1000 |
//! | Vegetarian | 8     | 2000 |
//! | Seafood    | 3     | 3000 |
//! | Dessert    | 2     | 4000 |
//! | Vegan      | 3     | 5000 |

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value, json};

use crate::serve;

/// Path prefix of the catalog API.
pub const API_PREFIX: &str = "/api/json/v1/1";

const CATEGORIES: [(&str, usize, usize); 5] = [
    ("Chicken", 7, 1000),
    ("Vegetarian", 8, 2000),
    ("Seafood", 3, 3000),
    ("Dessert", 2, 4000),
    ("Vegan", 3, 5000),
];

const INGREDIENTS: [&str; 10] = [
    "Chicken", "Rice", "Garlic", "Onion", "Tomato", "Salt", "Pepper", "Olive Oil", "Lemon",
    "Basil",
];

/// A generated catalog entry.
#[derive(Debug, Clone)]
pub struct FakeMeal {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub ingredients: Vec<&'static str>,
}

/// Every meal in the fake catalog.
#[must_use]
pub fn catalog() -> Vec<FakeMeal> {
    CATEGORIES
        .iter()
        .flat_map(|&(category, count, first_id)| {
            (0..count).map(move |n| FakeMeal {
                id: (first_id + n).to_string(),
                name: format!("{category} Dish {n}"),
                category,
                ingredients: INGREDIENTS.iter().copied().cycle().take(n + 1).collect(),
            })
        })
        .collect()
}

#[derive(Default)]
struct MealDbState {
    failing_categories: Mutex<HashSet<String>>,
    lookups: AtomicUsize,
}

/// Handle to a running fake catalog.
pub struct FakeMealDb {
    url: String,
    state: Arc<MealDbState>,
}

impl FakeMealDb {
    pub async fn start() -> Self {
        let state = Arc::new(MealDbState::default());

        let api = Router::new()
            .route("/search.php", get(search))
            .route("/filter.php", get(filter))
            .route("/lookup.php", get(lookup))
            .with_state(state.clone());

        let base = serve(Router::new().nest(API_PREFIX, api)).await;

        Self {
            url: format!("{base}{API_PREFIX}"),
            state,
        }
    }

    /// Catalog base URL, including the API prefix.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make `filter.php?c=<category>` answer 500.
    pub fn fail_category(&self, category: &str) {
        self.state
            .failing_categories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category.to_string());
    }

    /// Requests received by `lookup.php` so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.state.lookups.load(Ordering::SeqCst)
    }
}

/// Full record, as returned by search and lookup.
fn full_record(meal: &FakeMeal) -> Value {
    let mut record = Map::new();
    record.insert("idMeal".into(), json!(meal.id));
    record.insert("strMeal".into(), json!(meal.name));
    record.insert("strCategory".into(), json!(meal.category));
    record.insert("strArea".into(), json!("Spanish"));
    record.insert("strInstructions".into(), json!("Mix.\r\nCook."));
    record.insert("strMealThumb".into(), json!(format!("https://img.test/{}.jpg", meal.id)));
    record.insert("strTags".into(), json!("Quick,Test"));
    record.insert("strYoutube".into(), Value::Null);

    for slot in 1..=20 {
        let ingredient = meal.ingredients.get(slot - 1);
        record.insert(format!("strIngredient{slot}"), json!(ingredient.unwrap_or(&"")));
        record.insert(
            format!("strMeasure{slot}"),
            json!(if ingredient.is_some() { "1 cup" } else { " " }),
        );
    }

    Value::Object(record)
}

/// Partial record, as returned by the filter endpoints.
fn summary_record(meal: &FakeMeal) -> Value {
    json!({
        "idMeal": meal.id,
        "strMeal": meal.name,
        "strMealThumb": format!("https://img.test/{}.jpg", meal.id),
    })
}

fn envelope(meals: Vec<Value>) -> Json<Value> {
    if meals.is_empty() {
        Json(json!({ "meals": null }))
    } else {
        Json(json!({ "meals": meals }))
    }
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let text = params.get("s").map(|s| s.to_lowercase()).unwrap_or_default();
    envelope(
        catalog()
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&text))
            .map(full_record)
            .collect(),
    )
}

async fn filter(
    State(state): State<Arc<MealDbState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if let Some(category) = params.get("c") {
        let failing = state
            .failing_categories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(category);
        if failing {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }

        return Ok(envelope(
            catalog()
                .iter()
                .filter(|m| m.category == category.as_str())
                .map(summary_record)
                .collect(),
        ));
    }

    let ingredient = params.get("i").map(String::as_str).unwrap_or_default();
    Ok(envelope(
        catalog()
            .iter()
            .filter(|m| m.ingredients.iter().any(|i| *i == ingredient))
            .map(summary_record)
            .collect(),
    ))
}

async fn lookup(
    State(state): State<Arc<MealDbState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.lookups.fetch_add(1, Ordering::SeqCst);

    let id = params.get("i").map(String::as_str).unwrap_or_default();
    envelope(catalog().iter().filter(|m| m.id == id).map(full_record).collect())
}
