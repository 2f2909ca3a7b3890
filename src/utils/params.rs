// src/utils/params.rs

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};

use crate::{error::AppError, utils::validator::Validator};

/// The `{id}` path segment as an integer.
///
/// Any failure, including a segment that is not valid UTF-8 once
/// percent-decoded, is a 404 in the JSON envelope.
#[derive(Debug, Clone, Copy)]
pub struct IdParam(pub i64);

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        read_id_param(&raw).map(IdParam)
    }
}

/// Raw query pairs in request order. Lookups return the first value for a
/// key, so repeated parameters never fail the request.
#[derive(Debug, Clone, Default)]
pub struct QueryValues(Vec<(String, String)>);

impl QueryValues {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<S> FromRequestParts<S> for QueryValues
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(QueryValues(pairs))
    }
}

/// Parses the `{id}` path segment. Anything that is not an integer is
/// reported as a missing resource rather than a bad request.
pub fn read_id_param(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| AppError::NotFound)
}

/// Returns the query value, or `default` when absent.
pub fn read_string(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

/// Parses an integer query value. A missing value yields `default`; an
/// unparsable one records a failure under `key` and also yields `default`.
pub fn read_int(v: &mut Validator, value: Option<&str>, default: i64, key: &str) -> i64 {
    match value {
        None | Some("") => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            v.add_error(key, "must be an integer value");
            default
        }),
    }
}
