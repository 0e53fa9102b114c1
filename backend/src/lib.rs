pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod store;

use sqlx::SqlitePool;

/// Shared application state available to all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
