use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::Catalog,
};

pub mod foods;
pub mod recipes;
pub mod users;

/// Shared state handed to every handler
pub struct AppState {
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(food_routes())
        .merge(recipe_routes())
        .merge(user_routes())
        .layer(
            // Request id first, so the trace span already sees it
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

fn food_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/food", get(foods::get_food).delete(foods::delete_food))
        .route("/food/addFood", post(foods::add_food))
        .route("/food/alternative", get(foods::find_alternatives))
}

fn recipe_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recipe", get(recipes::get_recipe).delete(recipes::delete_recipe))
        .route("/recipe/addRecipe", post(recipes::add_recipe))
        .route("/recipe/alternative", get(recipes::find_alternatives))
        .route("/recipe/totalCalorie", get(recipes::total_calories))
        .route("/recipe/calorieBreakdown", get(recipes::calorie_breakdown))
        .route("/recipe/viewRecipe", post(recipes::view_recipe))
        .route("/recipe/likeRecipe", post(recipes::like_recipe))
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(users::get_user).delete(users::delete_user))
        .route("/user/addUser", post(users::add_user))
        .route("/user/likeRecipe", post(users::like_recipe))
        .route("/user/unlikeRecipe", post(users::unlike_recipe))
        .route("/user/recommend", get(users::recommend))
        .route("/user/recommendHealthy", get(users::recommend_healthy))
}

/// CORS for the single web client origin
pub fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", allowed_origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "store": state.catalog.backend() })),
    )
}
