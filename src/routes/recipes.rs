use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::Recipe,
    routes::AppState,
    services::{
        alternatives::{self, RecipeAlternatives},
        mutations,
        nutrition::{self, CalorieBreakdown},
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeQuery {
    pub recipe_id: i64,
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<Recipe>> {
    let Query(query) = query?;
    let recipe: Recipe = state.catalog.require(query.recipe_id).await?;
    Ok(Json(recipe))
}

pub async fn add_recipe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Recipe>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(recipe) = payload?;
    tracing::info!(
        request_id = %request_id,
        recipe_id = recipe.recipe_id(),
        ingredients = recipe.ingredients().len(),
        "Adding recipe"
    );

    mutations::add_entity(&state.catalog, &recipe).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Recipe added",
            "recipeId": recipe.recipe_id(),
        })),
    ))
}

pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    tracing::info!(request_id = %request_id, recipe_id = query.recipe_id, "Deleting recipe");

    mutations::delete_entity::<Recipe>(&state.catalog, query.recipe_id).await?;

    Ok(Json(json!({
        "message": "Recipe deleted",
        "recipeId": query.recipe_id,
    })))
}

pub async fn find_alternatives(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<RecipeAlternatives>> {
    let Query(query) = query?;
    tracing::info!(request_id = %request_id, recipe_id = query.recipe_id, "Finding recipe alternatives");

    let alternatives = alternatives::recipe_alternatives(&state.catalog, query.recipe_id).await?;
    Ok(Json(alternatives))
}

pub async fn total_calories(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    let total = nutrition::total_calories(&state.catalog, query.recipe_id).await?;

    Ok(Json(json!({
        "recipeId": query.recipe_id,
        "totalCalories": total,
    })))
}

pub async fn calorie_breakdown(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<CalorieBreakdown>> {
    let Query(query) = query?;
    let breakdown = nutrition::calorie_breakdown(&state.catalog, query.recipe_id).await?;
    Ok(Json(breakdown))
}

pub async fn view_recipe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    let recipe = mutations::increment_views(&state.catalog, query.recipe_id).await?;

    tracing::info!(
        request_id = %request_id,
        recipe_id = query.recipe_id,
        views = recipe.views(),
        "Recipe viewed"
    );

    Ok(Json(json!({
        "message": "Recipe viewed",
        "recipeId": recipe.recipe_id(),
        "views": recipe.views(),
    })))
}

/// Anonymous like, not tied to any user
pub async fn like_recipe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    let recipe = mutations::increment_likes(&state.catalog, query.recipe_id).await?;

    tracing::info!(
        request_id = %request_id,
        recipe_id = query.recipe_id,
        likes = recipe.likes(),
        "Recipe liked"
    );

    Ok(Json(json!({
        "message": "Recipe liked",
        "recipeId": recipe.recipe_id(),
        "likes": recipe.likes(),
    })))
}
