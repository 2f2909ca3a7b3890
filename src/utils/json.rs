// src/utils/json.rs

use axum::{
    body::Bytes,
    extract::{
        FromRequest, Request,
        rejection::{BytesRejection, FailedToBufferBody},
    },
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, error::Category};

use crate::error::AppError;

/// Upper bound on accepted request bodies. Enforced by the
/// `DefaultBodyLimit` layer installed in `routes`.
pub const MAX_BODY_BYTES: usize = 256_000;

/// Strict JSON body extractor.
///
/// Unlike `axum::Json` it enforces a single JSON object per body and reports
/// each kind of malformed input with its own message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadJson<T>(pub T);

impl<T, S> FromRequest<S> for ReadJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                    AppError::BadRequest(format!(
                        "the body must not be larger than {} bytes",
                        MAX_BODY_BYTES
                    ))
                }
                other => {
                    tracing::warn!("Failed to read request body: {}", other);
                    AppError::BadRequest("the body could not be read".to_string())
                }
            })?;

        decode_json(&bytes).map(ReadJson).map_err(AppError::BadRequest)
    }
}

/// Decodes exactly one JSON object from `bytes` into `T`, translating
/// failures into client-facing messages.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err("the body must not be empty".to_string());
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value: Value =
        serde::Deserialize::deserialize(&mut de).map_err(|e| describe_syntax(bytes, &e))?;

    if de.end().is_err() {
        return Err("the body must only contain a single JSON value".to_string());
    }

    // Derived struct deserializers also accept sequences; request bodies
    // are objects only.
    let Value::Object(map) = &value else {
        return Err(format!(
            "the body contains incorrect JSON type (at character {})",
            value_start(bytes)
        ));
    };

    <T as serde::Deserialize>::deserialize(&value).map_err(|e| describe_data::<T>(map, &e))
}

fn describe_syntax(bytes: &[u8], err: &serde_json::Error) -> String {
    match err.classify() {
        Category::Eof => "the body contains badly-formed JSON".to_string(),
        Category::Io => "the body could not be read".to_string(),
        Category::Syntax | Category::Data => format!(
            "the body contains badly-formed JSON (at character {})",
            byte_offset(bytes, err.line(), err.column())
        ),
    }
}

fn describe_data<T: DeserializeOwned>(map: &Map<String, Value>, err: &serde_json::Error) -> String {
    if let Some(field) = unknown_field(&err.to_string()) {
        format!("the body contains unknown key \"{}\"", field)
    } else if let Some(field) = mistyped_field::<T>(map) {
        format!("the body contains incorrect JSON type for field \"{}\"", field)
    } else {
        "the body contains incorrect JSON type".to_string()
    }
}

/// Turns serde_json's one-based line/column (columns count bytes) into a
/// one-based byte offset into the body.
fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = bytes
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    line_start + column
}

/// One-based offset of the first non-whitespace byte.
fn value_start(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(1, |i| i + 1)
}

/// Pulls the name out of serde's "unknown field `name`, expected ..." message.
fn unknown_field(msg: &str) -> Option<String> {
    let rest = msg.strip_prefix("unknown field `")?;
    rest.split('`').next().map(str::to_string)
}

/// Finds the first top-level key whose value alone fails to decode with a
/// type error. Required fields of `T` that are absent from the probe show up
/// as "missing field" errors and are ignored.
fn mistyped_field<T: DeserializeOwned>(map: &Map<String, Value>) -> Option<String> {
    map.iter().find_map(|(key, value)| {
        let single = Value::Object([(key.clone(), value.clone())].into_iter().collect());
        match <T as serde::Deserialize>::deserialize(&single) {
            Err(e) if e.to_string().starts_with("invalid") => Some(key.clone()),
            _ => None,
        }
    })
}
