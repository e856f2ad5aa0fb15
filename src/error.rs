use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PatchwatchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unusable source document: {0}")]
    SourceFormat(String),

    #[error("Actor error: {0}")]
    Actor(String),
}

impl IntoResponse for PatchwatchError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            PatchwatchError::Database(_) | PatchwatchError::Actor(_) | PatchwatchError::Json(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.",
            ),
            PatchwatchError::Http(_) | PatchwatchError::SourceFormat(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Upstream source error.",
            ),
        };
        (
            status,
            Json(json!({ "error": { "code": code, "message": message } })),
        )
            .into_response()
    }
}
