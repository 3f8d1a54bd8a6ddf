use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::{
    db::Filter,
    error::AppResult,
    models::{Food, Recipe},
    services::Catalog,
};

/// Maximum number of food alternatives returned
pub const FOOD_ALTERNATIVE_LIMIT: usize = 5;
/// Size of the most-viewed recipe bucket
pub const TOP_RECIPE_ALTERNATIVES: usize = 3;
/// Size of the random recipe bucket
pub const RANDOM_RECIPE_ALTERNATIVES: usize = 3;

/// Lower-calorie substitutes for a recipe, split into two disjoint buckets
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeAlternatives {
    /// Most viewed candidates, highest views first
    pub top_alternatives: Vec<Recipe>,
    /// Uniformly drawn from the candidates not in `top_alternatives`
    pub random_alternatives: Vec<Recipe>,
}

/// Finds lower-calorie foods in the same category as `food_id`
///
/// Returns an empty list when the food exists but nothing qualifies.
pub async fn food_alternatives(catalog: &Catalog, food_id: i64) -> AppResult<Vec<Food>> {
    let target: Food = catalog.require(food_id).await?;

    let filter = Filter::category_below(target.category(), target.calories());
    let mut seen = HashSet::new();
    let candidates: Vec<Food> = catalog
        .search::<Food>(&filter)
        .await?
        .into_iter()
        .filter(|food| {
            food.food_id() != food_id
                && food.category() == target.category()
                && food.calories() < target.calories()
        })
        .filter(|food| seen.insert(food.food_id()))
        .collect();

    let candidate_count = candidates.len();
    let selected = sample_foods(candidates, &mut rand::thread_rng());

    tracing::info!(
        food_id,
        candidates = candidate_count,
        selected = selected.len(),
        "Food alternatives selected"
    );

    Ok(selected)
}

/// Shuffles the candidates and keeps at most [`FOOD_ALTERNATIVE_LIMIT`]
pub fn sample_foods<R: Rng + ?Sized>(mut candidates: Vec<Food>, rng: &mut R) -> Vec<Food> {
    candidates.shuffle(rng);
    candidates.truncate(FOOD_ALTERNATIVE_LIMIT);
    candidates
}

/// Finds lower-calorie recipes in the same category as `recipe_id`
///
/// Totals are recomputed from ingredients, so a candidate whose stored total is
/// stale is dropped here even if the store let it through.
pub async fn recipe_alternatives(catalog: &Catalog, recipe_id: i64) -> AppResult<RecipeAlternatives> {
    let target: Recipe = catalog.require(recipe_id).await?;
    let target_calories = target.total_calories();

    let filter = Filter::category_below(target.category(), target_calories);
    let mut seen = HashSet::new();
    let candidates: Vec<Recipe> = catalog
        .search::<Recipe>(&filter)
        .await?
        .into_iter()
        .filter(|recipe| {
            recipe.recipe_id() != recipe_id
                && recipe.category() == target.category()
                && recipe.total_calories() < target_calories
        })
        .filter(|recipe| seen.insert(recipe.recipe_id()))
        .collect();

    let candidate_count = candidates.len();
    let alternatives = split_recipe_alternatives(candidates, &mut rand::thread_rng());

    tracing::info!(
        recipe_id,
        candidates = candidate_count,
        top = alternatives.top_alternatives.len(),
        random = alternatives.random_alternatives.len(),
        "Recipe alternatives selected"
    );

    Ok(alternatives)
}

/// Splits distinct candidates into the most-viewed bucket and a random bucket
pub fn split_recipe_alternatives<R: Rng + ?Sized>(
    mut candidates: Vec<Recipe>,
    rng: &mut R,
) -> RecipeAlternatives {
    candidates.sort_by(|a, b| b.views().cmp(&a.views()));

    let split_at = TOP_RECIPE_ALTERNATIVES.min(candidates.len());
    let mut remainder = candidates.split_off(split_at);
    remainder.shuffle(rng);
    remainder.truncate(RANDOM_RECIPE_ALTERNATIVES);

    RecipeAlternatives {
        top_alternatives: candidates,
        random_alternatives: remainder,
    }
}
