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
    models::{Recipe, User},
    routes::AppState,
    services::{mutations, recommendations},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecipeQuery {
    pub user_id: i64,
    pub recipe_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthyQuery {
    pub user_id: i64,
    pub calorie_max: i64,
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> AppResult<Json<User>> {
    let Query(query) = query?;
    let user: User = state.catalog.require(query.user_id).await?;
    Ok(Json(user))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<User>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(user) = payload?;
    tracing::info!(request_id = %request_id, user_id = user.user_id(), "Adding user");

    mutations::add_entity(&state.catalog, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User added",
            "userId": user.user_id(),
        })),
    ))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    tracing::info!(request_id = %request_id, user_id = query.user_id, "Deleting user");

    mutations::delete_entity::<User>(&state.catalog, query.user_id).await?;

    Ok(Json(json!({
        "message": "User deleted",
        "userId": query.user_id,
    })))
}

pub async fn like_recipe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<UserRecipeQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    tracing::info!(
        request_id = %request_id,
        user_id = query.user_id,
        recipe_id = query.recipe_id,
        "User liking recipe"
    );

    mutations::like_recipe(&state.catalog, query.user_id, query.recipe_id).await?;

    Ok(Json(json!({
        "message": "Recipe liked",
        "userId": query.user_id,
        "recipeId": query.recipe_id,
    })))
}

pub async fn unlike_recipe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<UserRecipeQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    tracing::info!(
        request_id = %request_id,
        user_id = query.user_id,
        recipe_id = query.recipe_id,
        "User unliking recipe"
    );

    mutations::unlike_recipe(&state.catalog, query.user_id, query.recipe_id).await?;

    Ok(Json(json!({
        "message": "Recipe unliked",
        "userId": query.user_id,
        "recipeId": query.recipe_id,
    })))
}

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Recipe>>> {
    let Query(query) = query?;
    tracing::info!(request_id = %request_id, user_id = query.user_id, "Processing recommendation request");

    let recipes = recommendations::recommend(&state.catalog, query.user_id).await?;
    Ok(Json(recipes))
}

pub async fn recommend_healthy(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<HealthyQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Recipe>>> {
    let Query(query) = query?;
    tracing::info!(
        request_id = %request_id,
        user_id = query.user_id,
        calorie_max = query.calorie_max,
        "Processing healthy recommendation request"
    );

    let recipes =
        recommendations::recommend_healthy(&state.catalog, query.user_id, query.calorie_max)
            .await?;
    Ok(Json(recipes))
}
