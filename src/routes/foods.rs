use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::Food,
    routes::AppState,
    services::{alternatives, mutations},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodQuery {
    pub food_id: i64,
}

pub async fn get_food(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FoodQuery>, QueryRejection>,
) -> AppResult<Json<Food>> {
    let Query(query) = query?;
    let food: Food = state.catalog.require(query.food_id).await?;
    Ok(Json(food))
}

pub async fn add_food(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Food>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(food) = payload?;
    tracing::info!(request_id = %request_id, food_id = food.food_id(), "Adding food");

    mutations::add_entity(&state.catalog, &food).await?;

    Ok(Json(json!({
        "message": "Food added",
        "foodId": food.food_id(),
    })))
}

pub async fn delete_food(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<FoodQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    tracing::info!(request_id = %request_id, food_id = query.food_id, "Deleting food");

    mutations::delete_entity::<Food>(&state.catalog, query.food_id).await?;

    Ok(Json(json!({
        "message": "Food deleted",
        "foodId": query.food_id,
    })))
}

/// Up to five lower-calorie foods from the same category
pub async fn find_alternatives(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<FoodQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Food>>> {
    let Query(query) = query?;
    tracing::info!(request_id = %request_id, food_id = query.food_id, "Finding food alternatives");

    let foods = alternatives::food_alternatives(&state.catalog, query.food_id).await?;
    Ok(Json(foods))
}
