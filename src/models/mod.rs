use serde::{de::DeserializeOwned, Serialize};

use crate::db::Collection;

pub mod food;
pub mod recipe;
pub mod user;

pub use food::{Food, FoodRecord};
pub use recipe::{Recipe, RecipeRecord};
pub use user::{User, UserRecord};

/// A value type that is persisted as one document in a store collection
///
/// `category` and `calories` are copied next to the document body so stores
/// can filter on them without decoding the body.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> i64;

    fn category(&self) -> Option<&str> {
        None
    }

    fn calories(&self) -> Option<i64> {
        None
    }
}

impl Entity for Food {
    const COLLECTION: Collection = Collection::Foods;

    fn id(&self) -> i64 {
        self.food_id()
    }

    fn category(&self) -> Option<&str> {
        Food::category(self)
    }

    fn calories(&self) -> Option<i64> {
        Some(Food::calories(self))
    }
}

impl Entity for Recipe {
    const COLLECTION: Collection = Collection::Recipes;

    fn id(&self) -> i64 {
        self.recipe_id()
    }

    fn category(&self) -> Option<&str> {
        Recipe::category(self)
    }

    // Denormalized for store-side filtering only; readers recompute.
    fn calories(&self) -> Option<i64> {
        Some(self.total_calories())
    }
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> i64 {
        self.user_id()
    }
}
