use crate::{config::Config, store::CommentStore};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub comments: CommentStore,
    pub config: Config,
}

impl AppState {
    /// Wires the comment store onto `pool` with the configured deadline.
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            comments: CommentStore::new(pool, config.db_timeout()),
            config,
        }
    }
}

impl FromRef<AppState> for CommentStore {
    fn from_ref(state: &AppState) -> Self {
        state.comments.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
