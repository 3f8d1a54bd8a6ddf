//! State-changing operations
//!
//! Every operation here reads, changes and writes back without a transaction.
//! Two requests racing on the same id can lose an update or both pass the
//! duplicate check; the store is trusted to keep the last write.

use crate::{
    error::{AppError, AppResult},
    models::{Entity, Recipe, User},
    services::Catalog,
};

/// Adds a new entity, refusing ids that are already taken
pub async fn add_entity<E: Entity>(catalog: &Catalog, entity: &E) -> AppResult<()> {
    let collection = E::COLLECTION;
    let id = entity.id();

    if catalog.find::<E>(id).await?.is_some() {
        tracing::info!(%collection, id, "Rejected duplicate id");
        return Err(AppError::AlreadyExists { collection, id });
    }

    // Someone else may have written the id since the lookup
    if !catalog.insert(entity).await? {
        return Err(AppError::AlreadyExists { collection, id });
    }

    tracing::info!(%collection, id, "Entity added");
    Ok(())
}

/// Deletes an entity by id
pub async fn delete_entity<E: Entity>(catalog: &Catalog, id: i64) -> AppResult<()> {
    let collection = E::COLLECTION;
    if !catalog.remove::<E>(id).await? {
        return Err(AppError::not_found(collection, id));
    }

    tracing::info!(%collection, id, "Entity deleted");
    Ok(())
}

/// Records one view of a recipe
pub async fn increment_views(catalog: &Catalog, recipe_id: i64) -> AppResult<Recipe> {
    let mut recipe: Recipe = catalog.require(recipe_id).await?;
    recipe.increment_views();
    catalog.save(&recipe).await?;

    tracing::debug!(recipe_id, views = recipe.views(), "Recipe view recorded");
    Ok(recipe)
}

/// Records one anonymous like of a recipe
pub async fn increment_likes(catalog: &Catalog, recipe_id: i64) -> AppResult<Recipe> {
    let mut recipe: Recipe = catalog.require(recipe_id).await?;
    recipe.increment_likes();
    catalog.save(&recipe).await?;

    tracing::debug!(recipe_id, likes = recipe.likes(), "Recipe like recorded");
    Ok(recipe)
}

/// Likes a recipe on behalf of a user and bumps the recipe's like counter
///
/// Liking the same recipe twice is rejected as invalid input.
pub async fn like_recipe(catalog: &Catalog, user_id: i64, recipe_id: i64) -> AppResult<User> {
    let mut user: User = catalog.require(user_id).await?;
    let mut recipe: Recipe = catalog.require(recipe_id).await?;

    if !user.like_recipe(&mut recipe) {
        return Err(AppError::InvalidInput(format!(
            "User {} already liked recipe {}",
            user_id, recipe_id
        )));
    }

    catalog.save(&recipe).await?;
    catalog.save(&user).await?;

    tracing::info!(user_id, recipe_id, likes = recipe.likes(), "User liked recipe");
    Ok(user)
}

/// Removes a recipe from a user's liked set
pub async fn unlike_recipe(catalog: &Catalog, user_id: i64, recipe_id: i64) -> AppResult<User> {
    let mut user: User = catalog.require(user_id).await?;
    catalog.require::<Recipe>(recipe_id).await?;

    if !user.unlike_recipe(recipe_id) {
        return Err(AppError::InvalidInput(format!(
            "User {} has not liked recipe {}",
            user_id, recipe_id
        )));
    }

    catalog.save(&user).await?;

    tracing::info!(user_id, recipe_id, "User unliked recipe");
    Ok(user)
}
