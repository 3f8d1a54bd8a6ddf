use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::Collection;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{} with id {id} already exists", .collection.entity_name())]
    AlreadyExists { collection: Collection, id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User {0} has no liked recipes to derive preferences from")]
    NoPreferences(i64),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(collection: Collection, id: i64) -> Self {
        AppError::NotFound(format!("{} with id {} not found", collection.entity_name(), id))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) | AppError::NoPreferences(_) => StatusCode::NOT_FOUND,
            // Foods have always reported duplicates as a plain bad request
            AppError::AlreadyExists {
                collection: Collection::Foods,
                ..
            } => StatusCode::BAD_REQUEST,
            AppError::AlreadyExists { .. } => StatusCode::CONFLICT,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        }

        let message = match self {
            AppError::NotFound(msg) | AppError::InvalidInput(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::not_found(Collection::Recipes, 3), StatusCode::NOT_FOUND),
            (AppError::NoPreferences(7), StatusCode::NOT_FOUND),
            (
                AppError::AlreadyExists {
                    collection: Collection::Foods,
                    id: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::AlreadyExists {
                    collection: Collection::Recipes,
                    id: 1,
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_not_found_message() {
        let error = AppError::not_found(Collection::Foods, 42);
        assert_eq!(error.to_string(), "Not found: Food with id 42 not found");
    }

    #[test]
    fn test_already_exists_message() {
        let error = AppError::AlreadyExists {
            collection: Collection::Users,
            id: 501,
        };
        assert_eq!(error.to_string(), "User with id 501 already exists");
    }
}
