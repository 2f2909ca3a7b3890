use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::config::Config;

/// Reports that the service is up, with its environment and version.
pub async fn healthcheck(State(config): State<Config>) -> impl IntoResponse {
    Json(json!({
        "status": "available",
        "environment": config.environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
