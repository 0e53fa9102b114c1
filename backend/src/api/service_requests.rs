use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::request::CompleteRequest,
    models::service_request::{CreateServiceRequest, ServiceRequest, UpdateCscFields},
    policy::{self, FieldGroup},
    store::records::{self, RecordKind},
};

/// Submit a calibration service request. Unlike the simple form, any
/// authenticated principal may file one.
pub async fn create(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Json(body): Json<CreateServiceRequest>,
) -> Result<Json<ServiceRequest>> {
    body.validate()?;

    let record = records::create_service_request(&pool, auth.id, body).await?;
    Ok(Json(policy::redact_for(auth.role, record)))
}

pub async fn list(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
) -> Result<Json<Vec<ServiceRequest>>> {
    if !policy::field_access(auth.role, FieldGroup::Core).can_read() {
        return Err(AppError::Forbidden);
    }

    let rows: Vec<ServiceRequest> = if auth.role.can_review_requests() {
        records::fetch_all(&pool, RecordKind::ServiceRequests).await?
    } else {
        records::fetch_by_owner(&pool, RecordKind::ServiceRequests, auth.id).await?
    };

    let rows = rows
        .into_iter()
        .map(|r| policy::redact_for(auth.role, r))
        .collect();

    Ok(Json(rows))
}

/// Owner or admin. The CSC-only fields are withheld from everyone but
/// admins, including the record's own creator.
pub async fn get_one(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>> {
    let record: ServiceRequest = records::fetch(&pool, RecordKind::ServiceRequests, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service request {} not found", id)))?;

    if !auth.role.can_review_requests() && record.user_id != auth.id {
        return Err(AppError::Forbidden);
    }

    Ok(Json(policy::redact_for(auth.role, record)))
}

/// Admin edit surface, same shallow-merge contract as the simple form.
pub async fn update(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<ServiceRequest>> {
    if !policy::field_access(auth.role, FieldGroup::Core).can_write() {
        return Err(AppError::Forbidden);
    }

    let record = records::update(&pool, RecordKind::ServiceRequests, id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service request {} not found", id)))?;

    Ok(Json(record))
}

/// Save the CSC remarks/notes without re-submitting the intake form.
pub async fn update_csc_fields(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCscFields>,
) -> Result<Json<ServiceRequest>> {
    if !policy::field_access(auth.role, FieldGroup::CscOnly).can_write() {
        return Err(AppError::Forbidden);
    }

    let mut patch = serde_json::Map::new();
    if let Some(remarks) = body.csc_remarks {
        patch.insert("cscRemarks".into(), json!(remarks));
    }
    if let Some(notes) = body.csc_internal_notes {
        patch.insert("cscInternalNotes".into(), json!(notes));
    }

    let record = records::update(&pool, RecordKind::ServiceRequests, id, patch.into())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service request {} not found", id)))?;

    Ok(Json(record))
}

/// Close the service request out. The intake form has no `comments` field,
/// so an optional completion note lands in the CSC remarks.
pub async fn complete(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<ServiceRequest>> {
    if !auth.role.can_review_requests() {
        return Err(AppError::Forbidden);
    }

    let mut patch = serde_json::Map::new();
    patch.insert("status".into(), json!("completed"));
    if let Some(note) = body.comments {
        patch.insert("cscRemarks".into(), json!(note));
    }

    let record = records::update(&pool, RecordKind::ServiceRequests, id, patch.into())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service request {} not found", id)))?;

    Ok(Json(record))
}

/// Administrative escape hatch; idempotent.
pub async fn remove(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    if !auth.role.is_admin() {
        return Err(AppError::Forbidden);
    }

    records::remove(&pool, RecordKind::ServiceRequests, id).await?;
    Ok(Json(json!({ "ok": true })))
}
