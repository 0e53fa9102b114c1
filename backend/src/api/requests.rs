use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{AuthUser, Role},
    error::{AppError, Result},
    models::request::{CompleteRequest, CreateRequest, SimpleRequest},
    policy::{self, FieldGroup},
    store::records::{self, RecordKind},
};

/// Submit a new simple request. Requesters only; the record is validated
/// before anything reaches the repository.
pub async fn create(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Json(body): Json<CreateRequest>,
) -> Result<Json<SimpleRequest>> {
    if auth.role != Role::Requester {
        return Err(AppError::Forbidden);
    }
    body.validate()?;

    let record = records::create_request(&pool, auth.id, body).await?;
    Ok(Json(record))
}

/// Requesters see their own submissions, admins see everything. Both are
/// ordered most recent first.
pub async fn list(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
) -> Result<Json<Vec<SimpleRequest>>> {
    if !policy::field_access(auth.role, FieldGroup::Core).can_read() {
        return Err(AppError::Forbidden);
    }

    let rows = if auth.role.can_review_requests() {
        records::fetch_all(&pool, RecordKind::Requests).await?
    } else {
        records::fetch_by_owner(&pool, RecordKind::Requests, auth.id).await?
    };

    Ok(Json(rows))
}

pub async fn get_one(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SimpleRequest>> {
    let record: SimpleRequest = records::fetch(&pool, RecordKind::Requests, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

    if !auth.role.can_review_requests() && record.user_id != auth.id {
        return Err(AppError::Forbidden);
    }

    Ok(Json(record))
}

/// Admin edit surface: shallow-merges the provided top-level fields onto
/// the stored record. Owner, id and submission time are immutable and
/// silently dropped from the patch.
pub async fn update(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<SimpleRequest>> {
    if !policy::field_access(auth.role, FieldGroup::Core).can_write() {
        return Err(AppError::Forbidden);
    }

    let record = records::update(&pool, RecordKind::Requests, id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

    Ok(Json(record))
}

/// The single most frequent admin action: close the request out without
/// re-submitting the whole record.
pub async fn complete(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<SimpleRequest>> {
    if !auth.role.can_review_requests() {
        return Err(AppError::Forbidden);
    }

    let note = body
        .comments
        .unwrap_or_else(|| "Form completed by CSC".to_string());
    let patch = json!({ "status": "completed", "comments": note });

    let record = records::update(&pool, RecordKind::Requests, id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

    Ok(Json(record))
}

/// Administrative escape hatch; no user journey exercises it. Idempotent.
pub async fn remove(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    if !auth.role.is_admin() {
        return Err(AppError::Forbidden);
    }

    records::remove(&pool, RecordKind::Requests, id).await?;
    Ok(Json(json!({ "ok": true })))
}
