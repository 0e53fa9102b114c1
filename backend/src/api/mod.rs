pub mod auth;
pub mod dashboard;
pub mod requests;
pub mod service_requests;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Auth / session
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Simple requests
        .route("/api/requests", get(requests::list).post(requests::create))
        .route(
            "/api/requests/:id",
            get(requests::get_one)
                .put(requests::update)
                .delete(requests::remove),
        )
        .route("/api/requests/:id/complete", post(requests::complete))
        // Extended service requests
        .route(
            "/api/service-requests",
            get(service_requests::list).post(service_requests::create),
        )
        .route(
            "/api/service-requests/:id",
            get(service_requests::get_one)
                .put(service_requests::update)
                .delete(service_requests::remove),
        )
        .route(
            "/api/service-requests/:id/complete",
            post(service_requests::complete),
        )
        .route(
            "/api/service-requests/:id/csc",
            patch(service_requests::update_csc_fields),
        )
        // Admin dashboard
        .route("/api/dashboard", get(dashboard::summary))
        .with_state(state)
}
