use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single food item with its calorie count
///
/// Identity is the food id: two foods with the same id compare equal even if
/// their other attributes differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FoodRecord")]
pub struct Food {
    food_id: i64,
    food_name: String,
    calories: i64,
    category: Option<String>,
}

/// Unvalidated wire form of a [`Food`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub food_id: Option<i64>,
    #[serde(default)]
    pub food_name: String,
    pub calories: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Food {
    /// Creates a food, rejecting negative ids and calorie counts
    pub fn new(
        food_id: i64,
        food_name: impl Into<String>,
        calories: i64,
        category: Option<String>,
    ) -> AppResult<Self> {
        if food_id < 0 {
            return Err(AppError::InvalidInput(format!(
                "Food id must be non-negative, got {}",
                food_id
            )));
        }
        if calories < 0 {
            return Err(AppError::InvalidInput(format!(
                "Calories must be non-negative, got {}",
                calories
            )));
        }

        Ok(Self {
            food_id,
            food_name: food_name.into(),
            calories,
            category,
        })
    }

    pub fn food_id(&self) -> i64 {
        self.food_id
    }

    pub fn food_name(&self) -> &str {
        &self.food_name
    }

    pub fn calories(&self) -> i64 {
        self.calories
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl TryFrom<FoodRecord> for Food {
    type Error = AppError;

    fn try_from(record: FoodRecord) -> AppResult<Self> {
        let food_id = record
            .food_id
            .ok_or_else(|| AppError::InvalidInput("Food id must be provided".to_string()))?;
        let calories = record.calories.ok_or_else(|| {
            AppError::InvalidInput(format!("Calories must be provided for food {}", food_id))
        })?;

        Food::new(food_id, record.food_name, calories, record.category)
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.food_id == other.food_id
    }
}

impl Eq for Food {}

impl Hash for Food {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.food_id.hash(state);
    }
}

impl PartialOrd for Food {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Food {
    fn cmp(&self, other: &Self) -> Ordering {
        self.food_id.cmp(&other.food_id)
    }
}
