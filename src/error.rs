//! Route-level error type mapped onto HTTP responses.

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid GitHub endpoint.")]
    InvalidEndpoint,

    #[error("Not Found")]
    NotFound,

    #[error("Upstream request failed.")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // The proxy contract promises a JSON error body for a bad
            // endpoint parameter.
            AppError::InvalidEndpoint => (
                StatusCode::BAD_REQUEST,
                [(CONTENT_TYPE, "application/json; charset=utf-8")],
                serde_json::json!({ "message": self.to_string() }).to_string(),
            )
                .into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, self.to_string()).into_response(),
        }
    }
}
