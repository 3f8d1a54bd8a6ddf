use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::AppResult,
    models::{Food, Recipe},
    services::Catalog,
};

/// Per-ingredient calories of a recipe, keyed by ingredient name
///
/// Keeps the recipe's ingredient order. A repeated name keeps its first
/// position but takes the calories of the last ingredient with that name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalorieBreakdown {
    entries: Vec<(String, i64)>,
}

impl CalorieBreakdown {
    pub fn from_ingredients(ingredients: &[Food]) -> Self {
        let mut breakdown = Self::default();
        for ingredient in ingredients {
            breakdown.insert(ingredient.food_name(), ingredient.calories());
        }
        breakdown
    }

    fn insert(&mut self, name: &str, calories: i64) {
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = calories,
            None => self.entries.push((name.to_string(), calories)),
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, calories)| *calories)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries
            .iter()
            .map(|(name, calories)| (name.as_str(), *calories))
    }
}

impl Serialize for CalorieBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, calories) in &self.entries {
            map.serialize_entry(name, calories)?;
        }
        map.end()
    }
}

/// Total calories of a recipe, recomputed from its ingredients
pub async fn total_calories(catalog: &Catalog, recipe_id: i64) -> AppResult<i64> {
    let recipe: Recipe = catalog.require(recipe_id).await?;
    Ok(recipe.total_calories())
}

/// Calories contributed by each ingredient of a recipe
pub async fn calorie_breakdown(catalog: &Catalog, recipe_id: i64) -> AppResult<CalorieBreakdown> {
    let recipe: Recipe = catalog.require(recipe_id).await?;
    Ok(CalorieBreakdown::from_ingredients(recipe.ingredients()))
}
