//! Custom error types for the Filmes API

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::{BODY_KEY, ValidationReport};

/// Custom error type for the Filmes API
#[derive(Error, Debug)]
pub enum ApiError {
    /// No record with the requested identifier
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: i32 },

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Payload failed field validation
    #[error("One or more validation errors occurred")]
    Validation(ValidationReport),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub fn filme_not_found(id: i32) -> Self {
        ApiError::NotFound {
            resource: "Filme",
            id,
        }
    }
}

impl From<ValidationReport> for ApiError {
    fn from(report: ValidationReport) -> Self {
        ApiError::Validation(report)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON of the wrong shape is a validation failure.
            JsonRejection::JsonDataError(err) => {
                ApiError::Validation(ValidationReport::single(BODY_KEY, err.body_text()))
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(report) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let body = Json(json!({
                    "title": "One or more validation errors occurred.",
                    "status": status.as_u16(),
                    "errors": report,
                }));
                return (
                    status,
                    [(header::CONTENT_TYPE, "application/problem+json")],
                    body,
                )
                    .into_response();
            }
            err @ ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(err) => {
                error!("Database failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
