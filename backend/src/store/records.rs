//! Keyed record repository for both request kinds.
//!
//! Each collection is one table keyed by record id. The full serialized
//! record lives in the `data` column; `owner_id`, `status` and
//! `submission_time_ns` are mirrored into columns so listing can filter and
//! order without parsing every document. The descending submission-time
//! order of `fetch_by_owner`/`fetch_all` is a contract dashboards rely on.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::common::RequestStatus;
use crate::models::request::{CreateRequest, SimpleRequest};
use crate::models::service_request::{CreateServiceRequest, ServiceRequest};

/// Which keyed collection an operation targets.
#[derive(Debug, Clone, Copy)]
pub enum RecordKind {
    Requests,
    ServiceRequests,
}

impl RecordKind {
    fn table(self) -> &'static str {
        match self {
            RecordKind::Requests => "requests",
            RecordKind::ServiceRequests => "service_requests",
        }
    }
}

/// Top-level keys assigned at creation and immutable thereafter. Stripped
/// from every update patch before merging.
const PROTECTED_KEYS: &[&str] = &["id", "userId", "submissionTime"];

/// Shallow merge: provided top-level keys replace, absent keys are
/// retained; nested objects are wholesale-replaced, not deep-merged.
pub fn merge_record(record: &mut Value, patch: Value) {
    let (Some(doc), Value::Object(patch)) = (record.as_object_mut(), patch) else {
        return;
    };
    for (key, value) in patch {
        if PROTECTED_KEYS.contains(&key.as_str()) {
            continue;
        }
        doc.insert(key, value);
    }
}

/// Create a simple request: fresh id, submission time = now, status
/// `submitted`, empty comments.
pub async fn create_request(
    pool: &SqlitePool,
    owner_id: Uuid,
    payload: CreateRequest,
) -> Result<SimpleRequest> {
    let record = SimpleRequest {
        id: Uuid::new_v4(),
        user_id: owner_id,
        submission_time: OffsetDateTime::now_utc(),
        status: RequestStatus::Submitted,
        comments: String::new(),
        personal_info: payload.personal_info,
        service_details: payload.service_details,
        additional_info: payload.additional_info,
    };

    insert(
        pool,
        RecordKind::Requests,
        record.id,
        record.user_id,
        record.status,
        record.submission_time,
        &record,
    )
    .await?;

    Ok(record)
}

/// Create an extended service request. An empty `serviceRequestNo` is
/// synthesized from the creation timestamp, matching the intake form.
pub async fn create_service_request(
    pool: &SqlitePool,
    owner_id: Uuid,
    payload: CreateServiceRequest,
) -> Result<ServiceRequest> {
    let submission_time = OffsetDateTime::now_utc();

    let service_request_no = if payload.service_request_no.is_empty() {
        format!("SR-{}", submission_time.unix_timestamp_nanos() / 1_000_000)
    } else {
        payload.service_request_no
    };

    let record = ServiceRequest {
        id: Uuid::new_v4(),
        user_id: owner_id,
        submission_time,
        status: RequestStatus::Submitted,
        service_request_no,
        date: payload.date,
        work_order_no: payload.work_order_no,
        organization_name: payload.organization_name,
        organization_address: payload.organization_address,
        contact_person: payload.contact_person,
        phone_no: payload.phone_no,
        fax_no: payload.fax_no,
        mobile_no: payload.mobile_no,
        email_id: payload.email_id,
        calibration_service: payload.calibration_service,
        calibration_request_date: payload.calibration_request_date,
        target_delivery_date: payload.target_delivery_date,
        frequency_of_calibration: payload.frequency_of_calibration,
        instrument_condition: payload.instrument_condition,
        calibration_method: payload.calibration_method,
        parameter_under_nabl: payload.parameter_under_nabl,
        statement_of_conformity: payload.statement_of_conformity,
        obs_reading: payload.obs_reading,
        mu_value: payload.mu_value,
        usl_value: payload.usl_value,
        lsl_value: payload.lsl_value,
        difference_with_contact_tender: payload.difference_with_contact_tender,
        difference_resolved: payload.difference_resolved,
        contact_accepted: payload.contact_accepted,
        deviation_from_contract: payload.deviation_from_contract,
        deviation_details: payload.deviation_details,
        contract_amended: payload.contract_amended,
        contract_review_repeated: payload.contract_review_repeated,
        amended_contract_communicated: payload.amended_contract_communicated,
        clarification_asked: payload.clarification_asked,
        witness_asked: payload.witness_asked,
        witness_activity: payload.witness_activity,
        price_as_per_price_list: payload.price_as_per_price_list,
        payment_terms: payload.payment_terms,
        delivery_mode: payload.delivery_mode,
        agreed_delivery_date_instrument: payload.agreed_delivery_date_instrument,
        agreed_delivery_date_certificate: payload.agreed_delivery_date_certificate,
        manual_provided: payload.manual_provided,
        instrument_list: payload.instrument_list,
        customer_signature: payload.customer_signature,
        overall_remarks: payload.overall_remarks,
        csc_remarks: None,
        csc_internal_notes: None,
    };

    insert(
        pool,
        RecordKind::ServiceRequests,
        record.id,
        record.user_id,
        record.status,
        record.submission_time,
        &record,
    )
    .await?;

    Ok(record)
}

async fn insert<T: Serialize>(
    pool: &SqlitePool,
    kind: RecordKind,
    id: Uuid,
    owner_id: Uuid,
    status: RequestStatus,
    submission_time: OffsetDateTime,
    record: &T,
) -> Result<()> {
    let data = serde_json::to_string(record)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize record: {}", e)))?;

    let sql = format!(
        "INSERT INTO {} (id, owner_id, status, submission_time_ns, data) VALUES (?1, ?2, ?3, ?4, ?5)",
        kind.table()
    );
    sqlx::query(&sql)
        .bind(id)
        .bind(owner_id)
        .bind(status.as_str())
        .bind(submission_time.unix_timestamp_nanos() as i64)
        .bind(data)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn fetch<T: DeserializeOwned>(
    pool: &SqlitePool,
    kind: RecordKind,
    id: Uuid,
) -> Result<Option<T>> {
    let sql = format!("SELECT data FROM {} WHERE id = ?1", kind.table());
    let raw: Option<String> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;

    raw.map(|data| parse_stored(&data)).transpose()
}

/// All records owned by `owner_id`, most recent submission first.
pub async fn fetch_by_owner<T: DeserializeOwned>(
    pool: &SqlitePool,
    kind: RecordKind,
    owner_id: Uuid,
) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT data FROM {} WHERE owner_id = ?1 ORDER BY submission_time_ns DESC",
        kind.table()
    );
    let rows: Vec<String> = sqlx::query_scalar(&sql).bind(owner_id).fetch_all(pool).await?;

    rows.iter().map(|data| parse_stored(data)).collect()
}

/// Every record regardless of owner, most recent submission first.
pub async fn fetch_all<T: DeserializeOwned>(pool: &SqlitePool, kind: RecordKind) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT data FROM {} ORDER BY submission_time_ns DESC",
        kind.table()
    );
    let rows: Vec<String> = sqlx::query_scalar(&sql).fetch_all(pool).await?;

    rows.iter().map(|data| parse_stored(data)).collect()
}

/// Shallow-merge `patch` onto the stored record and persist in a single
/// statement. Returns `None` when the id does not exist. The merged
/// document must still deserialize as `T`; otherwise the patch is rejected
/// without writing anything.
pub async fn update<T: DeserializeOwned + Serialize>(
    pool: &SqlitePool,
    kind: RecordKind,
    id: Uuid,
    patch: Value,
) -> Result<Option<T>> {
    let sql = format!("SELECT data FROM {} WHERE id = ?1", kind.table());
    let raw: Option<String> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut doc: Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt stored record {}: {}", id, e)))?;
    merge_record(&mut doc, patch);

    let record: T = serde_json::from_value(doc.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid record fields: {}", e)))?;

    let status = doc
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let data = doc.to_string();

    let sql = format!(
        "UPDATE {} SET data = ?2, status = ?3 WHERE id = ?1",
        kind.table()
    );
    sqlx::query(&sql)
        .bind(id)
        .bind(data)
        .bind(status)
        .execute(pool)
        .await?;

    Ok(Some(record))
}

/// Idempotent delete: removing an absent id is a success.
pub async fn remove(pool: &SqlitePool, kind: RecordKind, id: Uuid) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
    sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(())
}

fn parse_stored<T: DeserializeOwned>(data: &str) -> Result<T> {
    serde_json::from_str(data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt stored record: {}", e)))
}
