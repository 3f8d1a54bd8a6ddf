use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::{
    db::Filter,
    error::{AppError, AppResult},
    models::{Recipe, User},
    services::Catalog,
};

/// Maximum number of recipes in one recommendation
pub const RECOMMENDATION_LIMIT: usize = 10;

/// Recommends recipes from the categories the user has liked
///
/// Fails with [`AppError::NoPreferences`] when the user has not liked any recipe.
/// The result order is random and changes from call to call.
pub async fn recommend(catalog: &Catalog, user_id: i64) -> AppResult<Vec<Recipe>> {
    let user: User = catalog.require(user_id).await?;
    let categories = liked_categories(catalog, &user).await?;

    if categories.is_empty() {
        tracing::info!(user_id, "No liked recipes to recommend from");
        return Err(AppError::NoPreferences(user_id));
    }

    let recommendations = recommend_within(catalog, &user, &categories, i64::MAX).await?;

    tracing::info!(
        user_id,
        categories = categories.len(),
        recommended = recommendations.len(),
        "Recommendations selected"
    );

    Ok(recommendations)
}

/// Recommends recipes with at most `calorie_max` total calories
///
/// Unlike [`recommend`], a user without likes still gets random recipes under the cap.
pub async fn recommend_healthy(
    catalog: &Catalog,
    user_id: i64,
    calorie_max: i64,
) -> AppResult<Vec<Recipe>> {
    let user: User = catalog.require(user_id).await?;
    let categories = liked_categories(catalog, &user).await?;

    let recommendations = recommend_within(catalog, &user, &categories, calorie_max).await?;

    tracing::info!(
        user_id,
        calorie_max,
        categories = categories.len(),
        recommended = recommendations.len(),
        "Healthy recommendations selected"
    );

    Ok(recommendations)
}

/// Distinct categories of the user's liked recipes, in like order
///
/// Liked ids that no longer resolve to a recipe are skipped.
async fn liked_categories(catalog: &Catalog, user: &User) -> AppResult<Vec<Option<String>>> {
    let mut categories = Vec::new();
    for recipe_id in user.liked_recipe_ids() {
        if let Some(recipe) = catalog.find::<Recipe>(*recipe_id).await? {
            let category = recipe.category().map(str::to_string);
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
    }
    Ok(categories)
}

async fn recommend_within(
    catalog: &Catalog,
    user: &User,
    categories: &[Option<String>],
    calorie_max: i64,
) -> AppResult<Vec<Recipe>> {
    let mut excluded: HashSet<i64> = user.liked_recipe_ids().iter().copied().collect();

    let mut preferred = Vec::new();
    for category in categories {
        let filter = Filter::category_at_most(category.as_deref(), calorie_max);
        for recipe in catalog.search::<Recipe>(&filter).await? {
            if recipe.total_calories() <= calorie_max && excluded.insert(recipe.recipe_id()) {
                preferred.push(recipe);
            }
        }
    }

    let mut backfill = Vec::new();
    if preferred.len() < RECOMMENDATION_LIMIT {
        for recipe in catalog.search::<Recipe>(&Filter::at_most(calorie_max)).await? {
            if recipe.total_calories() <= calorie_max && excluded.insert(recipe.recipe_id()) {
                backfill.push(recipe);
            }
        }
    }

    tracing::debug!(
        user_id = user.user_id(),
        preferred = preferred.len(),
        backfill = backfill.len(),
        "Recommendation candidates gathered"
    );

    Ok(assemble(preferred, backfill, &mut rand::thread_rng()))
}

/// Tops `preferred` up to the limit with random backfill, then shuffles and truncates
pub fn assemble<R: Rng + ?Sized>(
    mut preferred: Vec<Recipe>,
    mut backfill: Vec<Recipe>,
    rng: &mut R,
) -> Vec<Recipe> {
    let missing = RECOMMENDATION_LIMIT.saturating_sub(preferred.len());
    if missing > 0 {
        backfill.shuffle(rng);
        preferred.extend(backfill.into_iter().take(missing));
    }

    preferred.shuffle(rng);
    preferred.truncate(RECOMMENDATION_LIMIT);
    preferred
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::Food;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;

    fn recipe(id: i64, category: &str, calories: i64) -> Recipe {
        let ingredient = Food::new(id, format!("Ingredient {}", id), calories, None).unwrap();
        Recipe::new(id, format!("Recipe {}", id), Some(category.to_string()), vec![ingredient])
            .unwrap()
    }

    async fn seeded(recipes: &[Recipe], users: &[User]) -> Catalog {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()));
        for recipe in recipes {
            catalog.insert(recipe).await.unwrap();
        }
        for user in users {
            catalog.insert(user).await.unwrap();
        }
        catalog
    }

    fn user_liking(user_id: i64, liked: &mut [Recipe]) -> User {
        let mut user = User::new(user_id, format!("user{}", user_id));
        for recipe in liked.iter_mut() {
            user.like_recipe(recipe);
        }
        user
    }

    fn ids(recipes: &[Recipe]) -> HashSet<i64> {
        recipes.iter().map(Recipe::recipe_id).collect()
    }

    #[test]
    fn test_assemble_prefers_category_matches() {
        let mut rng = StdRng::seed_from_u64(11);
        let preferred: Vec<Recipe> = (1..=4).map(|id| recipe(id, "Dinner", 100)).collect();
        let backfill: Vec<Recipe> = (100..120).map(|id| recipe(id, "Lunch", 100)).collect();

        let result = assemble(preferred, backfill, &mut rng);
        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
        for id in 1..=4 {
            assert!(ids(&result).contains(&id));
        }
    }

    #[test]
    fn test_assemble_truncates_large_preferred_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let preferred: Vec<Recipe> = (1..=25).map(|id| recipe(id, "Dinner", 100)).collect();
        let backfill = vec![recipe(99, "Lunch", 100)];

        let result = assemble(preferred, backfill, &mut rng);
        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
        assert!(!ids(&result).contains(&99));
    }

    #[tokio::test]
    async fn test_recommend_excludes_liked_recipes() {
        let mut liked = vec![recipe(1, "Dinner", 500)];
        let user = user_liking(501, &mut liked);
        let mut recipes = liked.clone();
        recipes.extend((2..=6).map(|id| recipe(id, "Dinner", 300)));
        recipes.extend((7..=9).map(|id| recipe(id, "Dessert", 800)));
        let catalog = seeded(&recipes, &[user]).await;

        let result = recommend(&catalog, 501).await.unwrap();
        let result_ids = ids(&result);
        assert!(!result_ids.contains(&1));
        assert_eq!(result_ids, (2..=9).collect::<HashSet<i64>>());
    }

    #[tokio::test]
    async fn test_recommend_caps_at_ten() {
        let mut liked = vec![recipe(1, "Dinner", 500)];
        let user = user_liking(501, &mut liked);
        let mut recipes = liked.clone();
        recipes.extend((2..=30).map(|id| recipe(id, "Dinner", 300)));
        let catalog = seeded(&recipes, &[user]).await;

        let result = recommend(&catalog, 501).await.unwrap();
        assert_eq!(result.len(), RECOMMENDATION_LIMIT);
        assert!(!ids(&result).contains(&1));
    }

    #[tokio::test]
    async fn test_recommend_without_likes_has_no_preferences() {
        let catalog = seeded(&[recipe(1, "Dinner", 50)], &[User::new(508, "lonely")]).await;
        let result = recommend(&catalog, 508).await;
        assert!(matches!(result, Err(AppError::NoPreferences(508))));
    }

    #[tokio::test]
    async fn test_recommend_unknown_user() {
        let catalog = seeded(&[], &[]).await;
        assert!(matches!(
            recommend(&catalog, 1).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            recommend_healthy(&catalog, 1, 100).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_recommend_healthy_without_likes() {
        let catalog = seeded(
            &[recipe(1, "Snack", 90), recipe(2, "Snack", 400)],
            &[User::new(508, "lonely")],
        )
        .await;

        let result = recommend_healthy(&catalog, 508, 100).await.unwrap();
        assert_eq!(ids(&result), HashSet::from([1]));
    }

    #[tokio::test]
    async fn test_recommend_healthy_respects_inclusive_cap() {
        let mut liked = vec![recipe(1, "Dinner", 200)];
        let user = user_liking(501, &mut liked);
        let mut recipes = liked.clone();
        recipes.push(recipe(2, "Dinner", 300));
        recipes.push(recipe(3, "Dinner", 301));
        recipes.push(recipe(4, "Lunch", 250));
        recipes.push(recipe(5, "Lunch", 900));
        let catalog = seeded(&recipes, &[user]).await;

        let result = recommend_healthy(&catalog, 501, 300).await.unwrap();
        assert!(result.iter().all(|r| r.total_calories() <= 300));
        assert_eq!(ids(&result), HashSet::from([2, 4]));
    }

    #[tokio::test]
    async fn test_liked_recipe_that_was_deleted_is_ignored() {
        let mut liked = vec![recipe(1, "Dinner", 200)];
        let user = user_liking(501, &mut liked);
        let catalog = seeded(&[recipe(2, "Lunch", 100)], &[user]).await;

        assert!(matches!(
            recommend(&catalog, 501).await,
            Err(AppError::NoPreferences(501))
        ));
        let healthy = recommend_healthy(&catalog, 501, 150).await.unwrap();
        assert_eq!(ids(&healthy), HashSet::from([2]));
    }
}
