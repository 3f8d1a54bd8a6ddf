use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{Food, FoodRecord};
use crate::error::{AppError, AppResult};

/// A recipe made of owned food ingredients
///
/// The total calorie count is never stored on the recipe itself; it is always
/// recomputed from the ingredients. Serialized recipes carry a `totalCalories`
/// field for clients, which is ignored when reading a recipe back.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RecipeRecord")]
pub struct Recipe {
    recipe_id: i64,
    recipe_name: String,
    category: Option<String>,
    ingredients: Vec<Food>,
    views: u32,
    likes: u32,
}

/// Unvalidated wire form of a [`Recipe`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub recipe_id: Option<i64>,
    #[serde(default)]
    pub recipe_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<FoodRecord>>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
}

impl Recipe {
    /// Creates a recipe with zero views and likes
    pub fn new(
        recipe_id: i64,
        recipe_name: impl Into<String>,
        category: Option<String>,
        ingredients: Vec<Food>,
    ) -> AppResult<Self> {
        if recipe_id < 0 {
            return Err(AppError::InvalidInput(format!(
                "Recipe id must be non-negative, got {}",
                recipe_id
            )));
        }

        if checked_total(&ingredients).is_none() {
            return Err(AppError::InvalidInput(format!(
                "Total calories of recipe {} exceed {}",
                recipe_id,
                i64::MAX
            )));
        }

        Ok(Self {
            recipe_id,
            recipe_name: recipe_name.into(),
            category,
            ingredients,
            views: 0,
            likes: 0,
        })
    }

    /// Sets the initial view and like counters
    pub fn with_counts(mut self, views: u32, likes: u32) -> Self {
        self.views = views;
        self.likes = likes;
        self
    }

    pub fn recipe_id(&self) -> i64 {
        self.recipe_id
    }

    pub fn recipe_name(&self) -> &str {
        &self.recipe_name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn ingredients(&self) -> &[Food] {
        &self.ingredients
    }

    pub fn views(&self) -> u32 {
        self.views
    }

    pub fn likes(&self) -> u32 {
        self.likes
    }

    /// Sum of the calories of every ingredient
    ///
    /// Construction rejects ingredient lists whose sum does not fit an `i64`.
    pub fn total_calories(&self) -> i64 {
        self.ingredients
            .iter()
            .fold(0i64, |total, food| total.saturating_add(food.calories()))
    }

    /// Records one view. Wraps around on overflow.
    pub fn increment_views(&mut self) {
        self.views = self.views.wrapping_add(1);
    }

    /// Records one like. Wraps around on overflow.
    pub fn increment_likes(&mut self) {
        self.likes = self.likes.wrapping_add(1);
    }
}

fn checked_total(ingredients: &[Food]) -> Option<i64> {
    ingredients
        .iter()
        .try_fold(0i64, |total, food| total.checked_add(food.calories()))
}

fn counter(name: &str, value: i64) -> AppResult<u32> {
    u32::try_from(value).map_err(|_| {
        AppError::InvalidInput(format!(
            "{} must be a non-negative 32-bit count, got {}",
            name, value
        ))
    })
}

impl TryFrom<RecipeRecord> for Recipe {
    type Error = AppError;

    fn try_from(record: RecipeRecord) -> AppResult<Self> {
        let recipe_id = record
            .recipe_id
            .ok_or_else(|| AppError::InvalidInput("Recipe id must be provided".to_string()))?;

        let ingredients = record
            .ingredients
            .unwrap_or_default()
            .into_iter()
            .map(Food::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        let views = counter("views", record.views)?;
        let likes = counter("likes", record.likes)?;

        Ok(Recipe::new(recipe_id, record.recipe_name, record.category, ingredients)?
            .with_counts(views, likes))
    }
}

impl Serialize for Recipe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Recipe", 7)?;
        state.serialize_field("recipeId", &self.recipe_id)?;
        state.serialize_field("recipeName", &self.recipe_name)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("ingredients", &self.ingredients)?;
        state.serialize_field("views", &self.views)?;
        state.serialize_field("likes", &self.likes)?;
        state.serialize_field("totalCalories", &self.total_calories())?;
        state.end()
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.recipe_id == other.recipe_id
    }
}

impl Eq for Recipe {}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.recipe_id.hash(state);
    }
}

impl PartialOrd for Recipe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Recipe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.recipe_id.cmp(&other.recipe_id)
    }
}
