// src/error.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::fmt;

use crate::{store::StoreError, utils::validator::Validator};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error. The detail is logged, never sent.
    InternalServerError(String),

    // 400 Bad Request (malformed body)
    BadRequest(String),

    // 404 Not Found
    NotFound,

    // 405 Method Not Allowed
    MethodNotAllowed(Method),

    // 409 Conflict (stale version on update)
    EditConflict,

    // 422 Unprocessable Entity, field -> message
    FailedValidation(BTreeMap<String, String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message): (StatusCode, Value) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("the server encountered a problem and could not process your request"),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!("the requested resource could not be found"),
            ),
            AppError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!(format!(
                    "the {} method is not supported for this resource",
                    method
                )),
            ),
            AppError::EditConflict => (
                StatusCode::CONFLICT,
                json!("unable to update the record due to an edit conflict, please try again"),
            ),
            AppError::FailedValidation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, json!(errors)),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts a non-empty `Validator` into a 422 response.
impl From<Validator> for AppError {
    fn from(v: Validator) -> Self {
        AppError::FailedValidation(v.into_errors())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            StoreError::EditConflict => AppError::EditConflict,
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}
