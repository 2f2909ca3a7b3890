// src/routes.rs

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method, header},
    routing::get,
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{
        comments::{self, EXPECTED_VERSION_HEADER},
        fallback, health,
    },
    state::AppState,
    utils::json::MAX_BODY_BYTES,
};

/// Assembles the main application router.
///
/// * Health check and comment CRUD routes under `/v1`.
/// * JSON 404/405 fallbacks.
/// * Global middleware (Trace, CORS, panic recovery, optional rate limit).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(EXPECTED_VERSION_HEADER),
        ]);

    let router = Router::new()
        .route("/v1/healthcheck", get(health::healthcheck))
        .route(
            "/v1/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/v1/comments/{id}",
            get(comments::show_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
        // Global Middleware (applied from outside in)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(fallback::recover_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let router = with_rate_limit(router, &state.config);

    router.with_state(state)
}

/// Per-IP token bucket. Requires the server to be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
fn with_rate_limit(router: Router<AppState>, config: &Config) -> Router<AppState> {
    if !config.limiter_enabled {
        return router;
    }

    // One token every 1/rps seconds.
    let Some(replenish) = Duration::from_secs(1).checked_div(config.limiter_rps) else {
        tracing::warn!("LIMITER_RPS is 0, limiter disabled");
        return router;
    };
    let nanos = u64::try_from(replenish.as_nanos()).unwrap_or(u64::MAX).max(1);

    let governor_conf = GovernorConfigBuilder::default()
        .per_nanosecond(nanos)
        .burst_size(config.limiter_burst.max(1))
        .finish();

    match governor_conf {
        Some(conf) => router.layer(GovernorLayer::new(Arc::new(conf))),
        None => {
            tracing::warn!("Invalid rate limiter settings, limiter disabled");
            router
        }
    }
}
