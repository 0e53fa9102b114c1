use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::request::SimpleRequest,
    models::service_request::ServiceRequest,
    policy,
    store::records::{self, RecordKind},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buckets<T> {
    pub pending_count: usize,
    pub completed_count: usize,
    pub pending: Vec<T>,
    pub completed: Vec<T>,
}

impl<T> Buckets<T> {
    fn new(pending: Vec<T>, completed: Vec<T>) -> Self {
        Buckets {
            pending_count: pending.len(),
            completed_count: completed.len(),
            pending,
            completed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub requests: Buckets<SimpleRequest>,
    pub service_requests: Buckets<ServiceRequest>,
}

/// Admin dashboard: both record kinds split into pending/resolved buckets,
/// recomputed fresh from the full listing on every load.
pub async fn summary(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
) -> Result<Json<DashboardSummary>> {
    if !auth.role.can_review_requests() {
        return Err(AppError::Forbidden);
    }

    let forms: Vec<SimpleRequest> = records::fetch_all(&pool, RecordKind::Requests).await?;
    let (pending_forms, completed_forms) = policy::split_buckets(forms, |f| f.status);

    let service: Vec<ServiceRequest> =
        records::fetch_all(&pool, RecordKind::ServiceRequests).await?;
    let (pending_service, completed_service) = policy::split_buckets(service, |s| s.status);

    Ok(Json(DashboardSummary {
        requests: Buckets::new(pending_forms, completed_forms),
        service_requests: Buckets::new(pending_service, completed_service),
    }))
}
