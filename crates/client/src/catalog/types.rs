//! Recipe catalog types.
//!
//! The catalog uses TheMealDB's flat record layout: display fields prefixed
//! with `str` and twenty numbered ingredient/measure pairs. Values are kept
//! verbatim; only the numbered pairs are folded into [`Ingredient`]s.

use meal_planner_core::MealId;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Highest ingredient index the catalog uses.
pub const MAX_INGREDIENTS: usize = 20;

/// A recipe from the catalog.
///
/// Filter endpoints (`filter.php`) return partial records carrying only the
/// id, name and thumbnail; the other fields are then `None` and
/// `ingredients` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMeal")]
pub struct Meal {
    pub id: MealId,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl Meal {
    /// A partial record, as returned by the filter endpoints.
    #[must_use]
    pub fn summary(id: impl Into<MealId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            area: None,
            instructions: None,
            thumbnail: None,
            tags: None,
            youtube: None,
            ingredients: Vec::new(),
        }
    }

    /// Tags split on commas, blanks removed.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// One `(strIngredientN, strMeasureN)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    /// Free-text amount ("1 tbsp"). Empty when the catalog has none.
    pub measure: String,
}

/// `{ "meals": [...] | null }` envelope used by every catalog endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<Meal>>,
}

impl MealsEnvelope {
    /// `null` means no results.
    pub(crate) fn into_meals(self) -> Vec<Meal> {
        self.meals.unwrap_or_default()
    }
}

/// Catalog record as it appears on the wire.
#[derive(Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal")]
    id: MealId,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    // strIngredient1..20, strMeasure1..20 and anything else the catalog adds
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        Self {
            ingredients: parse_ingredients(&raw.rest),
            id: raw.id,
            name: raw.name,
            category: raw.category,
            area: raw.area,
            instructions: raw.instructions,
            thumbnail: raw.thumbnail,
            tags: raw.tags,
            youtube: raw.youtube,
        }
    }
}

/// Collect the numbered ingredient pairs. Blank names are skipped.
fn parse_ingredients(fields: &Map<String, Value>) -> Vec<Ingredient> {
    let text = |key: String| {
        fields
            .get(&key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
    };

    (1..=MAX_INGREDIENTS)
        .filter_map(|i| {
            let name = text(format!("strIngredient{i}"));
            if name.is_empty() {
                return None;
            }
            Some(Ingredient {
                name: name.to_string(),
                measure: text(format!("strMeasure{i}")).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let json = r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350.",
            "strMealThumb": "https://example.com/t.jpg",
            "strTags": "Meat,Casserole",
            "strYoutube": "https://youtube.com/watch?v=4aZr5hZXP_s",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "water",
            "strMeasure2": null,
            "strIngredient3": "",
            "strMeasure3": "",
            "strIngredient4": "  ",
            "strIngredient5": "brown sugar",
            "strMeasure5": "1/2 cup",
            "strIngredient6": null,
            "strSource": null
        }"#;

        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.id.as_str(), "52772");
        assert_eq!(meal.area.as_deref(), Some("Japanese"));
        assert_eq!(
            meal.ingredients,
            vec![
                Ingredient {
                    name: "soy sauce".to_string(),
                    measure: "3/4 cup".to_string()
                },
                Ingredient {
                    name: "water".to_string(),
                    measure: String::new()
                },
                Ingredient {
                    name: "brown sugar".to_string(),
                    measure: "1/2 cup".to_string()
                },
            ]
        );
        assert_eq!(meal.tag_list().collect::<Vec<_>>(), vec!["Meat", "Casserole"]);
    }

    #[test]
    fn test_ingredients_beyond_twenty_are_ignored() {
        let json = r#"{"idMeal":"1","strMeal":"X","strIngredient21":"salt"}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert!(meal.ingredients.is_empty());
    }

    #[test]
    fn test_filter_record_is_partial() {
        let json = r#"{"idMeal":"52959","strMeal":"Baked salmon","strMealThumb":"t.jpg"}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.thumbnail.as_deref(), Some("t.jpg"));
        assert!(meal.category.is_none());
        assert!(meal.ingredients.is_empty());
        assert_eq!(meal.tag_list().count(), 0);
    }

    #[test]
    fn test_null_meals_is_empty() {
        let envelope: MealsEnvelope = serde_json::from_str(r#"{"meals":null}"#).unwrap();
        assert!(envelope.into_meals().is_empty());

        let missing: MealsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(missing.into_meals().is_empty());
    }
}
