use std::fmt::Display;

use serde_json::Value;

use crate::{error::AppResult, models::Entity};

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Foods,
    Recipes,
    Users,
}

impl Collection {
    /// Collection name as stored in the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Foods => "foods",
            Collection::Recipes => "recipes",
            Collection::Users => "users",
        }
    }

    /// Human readable name of one entity in this collection
    pub fn entity_name(&self) -> &'static str {
        match self {
            Collection::Foods => "Food",
            Collection::Recipes => "Recipe",
            Collection::Users => "User",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored document plus the fields stores are able to filter on
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i64,
    pub category: Option<String>,
    pub calories: Option<i64>,
    pub body: Value,
}

impl Document {
    /// Encodes an entity into its document form
    pub fn from_entity<E: Entity>(entity: &E) -> AppResult<Self> {
        Ok(Self {
            id: entity.id(),
            category: entity.category().map(str::to_string),
            calories: entity.calories(),
            body: serde_json::to_value(entity)?,
        })
    }

    /// Decodes the document body back into an entity
    pub fn decode<E: Entity>(self) -> AppResult<E> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Category predicate of a [`Filter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    /// Exact match. `Equals(None)` selects uncategorized documents.
    Equals(Option<String>),
}

/// Upper bound on the `calories` field of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalorieBound {
    /// `calories < n`
    Below(i64),
    /// `calories <= n`
    AtMost(i64),
}

impl CalorieBound {
    pub fn admits(&self, calories: i64) -> bool {
        match *self {
            CalorieBound::Below(bound) => calories < bound,
            CalorieBound::AtMost(bound) => calories <= bound,
        }
    }
}

/// Conjunction of simple predicates a store must be able to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub category: CategoryFilter,
    pub calories: Option<CalorieBound>,
}

impl Filter {
    /// Every document in the collection
    pub fn all() -> Self {
        Self {
            category: CategoryFilter::Any,
            calories: None,
        }
    }

    /// Same category, `calories < bound`
    pub fn category_below(category: Option<&str>, bound: i64) -> Self {
        Self {
            category: CategoryFilter::Equals(category.map(str::to_string)),
            calories: Some(CalorieBound::Below(bound)),
        }
    }

    /// Same category, `calories <= bound`
    pub fn category_at_most(category: Option<&str>, bound: i64) -> Self {
        Self {
            category: CategoryFilter::Equals(category.map(str::to_string)),
            calories: Some(CalorieBound::AtMost(bound)),
        }
    }

    /// Any category, `calories <= bound`
    pub fn at_most(bound: i64) -> Self {
        Self {
            category: CategoryFilter::Any,
            calories: Some(CalorieBound::AtMost(bound)),
        }
    }

    /// Whether a document satisfies every predicate
    pub fn matches(&self, document: &Document) -> bool {
        let category_ok = match &self.category {
            CategoryFilter::Any => true,
            CategoryFilter::Equals(category) => document.category == *category,
        };

        let calories_ok = match (self.calories, document.calories) {
            (None, _) => true,
            (Some(bound), Some(calories)) => bound.admits(calories),
            (Some(_), None) => false,
        };

        category_ok && calories_ok
    }
}

/// Document store the service persists its entities in
///
/// Stores only answer point lookups and [`Filter`] queries. `insert` returns
/// `false` when the id is taken and `update`/`delete` return `false` when it is
/// missing. Query results carry no ordering guarantee.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: i64) -> AppResult<Option<Document>>;

    async fn insert(&self, collection: Collection, document: Document) -> AppResult<bool>;

    async fn update(&self, collection: Collection, document: Document) -> AppResult<bool>;

    async fn delete(&self, collection: Collection, id: i64) -> AppResult<bool>;

    async fn query(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Food;

    fn doc(category: Option<&str>, calories: Option<i64>) -> Document {
        Document {
            id: 1,
            category: category.map(str::to_string),
            calories,
            body: Value::Null,
        }
    }

    #[test]
    fn test_collection_display() {
        assert_eq!(format!("{}", Collection::Foods), "foods");
        assert_eq!(Collection::Recipes.entity_name(), "Recipe");
    }

    #[test]
    fn test_strict_bound() {
        let filter = Filter::category_below(Some("Snack"), 300);
        assert!(filter.matches(&doc(Some("Snack"), Some(299))));
        assert!(!filter.matches(&doc(Some("Snack"), Some(300))));
        assert!(!filter.matches(&doc(Some("Fruit"), Some(10))));
    }

    #[test]
    fn test_inclusive_bound() {
        let filter = Filter::category_at_most(Some("Dinner"), 500);
        assert!(filter.matches(&doc(Some("Dinner"), Some(500))));
        assert!(!filter.matches(&doc(Some("Dinner"), Some(501))));
    }

    #[test]
    fn test_uncategorized_match() {
        let filter = Filter::category_below(None, 100);
        assert!(filter.matches(&doc(None, Some(50))));
        assert!(!filter.matches(&doc(Some("Snack"), Some(50))));
    }

    #[test]
    fn test_missing_calories_never_match_a_bound() {
        assert!(!Filter::at_most(i64::MAX).matches(&doc(None, None)));
        assert!(Filter::all().matches(&doc(None, None)));
    }

    #[test]
    fn test_document_round_trip() {
        let food = Food::new(7, "Celery", 6, Some("Vegetable".to_string())).unwrap();
        let document = Document::from_entity(&food).unwrap();
        assert_eq!(document.id, 7);
        assert_eq!(document.category.as_deref(), Some("Vegetable"));
        assert_eq!(document.calories, Some(6));

        let decoded: Food = document.decode().unwrap();
        assert_eq!(decoded.food_name(), "Celery");
    }
}
