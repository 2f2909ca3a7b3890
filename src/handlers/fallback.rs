// src/handlers/fallback.rs

use std::any::Any;

use axum::{
    http::{HeaderValue, Method, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}

/// Turns a handler panic into the generic 500 body and closes the
/// connection.
pub fn recover_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    let mut response =
        AppError::InternalServerError(format!("handler panicked: {}", detail)).into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn panics_become_generic_500() {
        let response = recover_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONNECTION], "close");
    }
}
