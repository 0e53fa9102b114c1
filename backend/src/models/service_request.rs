use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::common::RequestStatus;

/// Extended calibration-service intake record.
///
/// `cscRemarks` and `cscInternalNotes` are admin-only: always present in
/// storage but withheld from non-admin reads and writable only through the
/// admin CSC-fields endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub submission_time: OffsetDateTime,
    pub status: RequestStatus,

    // Service request identifiers
    pub service_request_no: String,
    pub date: String,
    pub work_order_no: String,

    // Customer / organization details
    pub organization_name: String,
    pub organization_address: String,
    pub contact_person: String,
    pub phone_no: String,
    pub fax_no: String,
    pub mobile_no: String,
    pub email_id: String,

    // Calibration scheduling
    pub calibration_service: CalibrationService,
    pub calibration_request_date: String,
    pub target_delivery_date: String,
    pub frequency_of_calibration: String,

    pub instrument_condition: InstrumentCondition,
    pub calibration_method: CalibrationMethod,

    // NABL conformity
    #[serde(rename = "parameterUnderNABL")]
    pub parameter_under_nabl: bool,
    pub statement_of_conformity: bool,

    // Pass/fail criteria (numeric-as-text bounds)
    pub obs_reading: String,
    pub mu_value: String,
    pub usl_value: String,
    pub lsl_value: String,

    // Contract-deviation questions
    pub difference_with_contact_tender: bool,
    pub difference_resolved: bool,
    pub contact_accepted: bool,
    pub deviation_from_contract: bool,
    pub deviation_details: String,
    pub contract_amended: bool,
    pub contract_review_repeated: bool,
    pub amended_contract_communicated: bool,
    pub clarification_asked: bool,
    pub witness_asked: bool,
    pub witness_activity: Vec<String>,

    // Commercial terms
    pub price_as_per_price_list: String,
    pub payment_terms: String,
    pub delivery_mode: String,
    pub agreed_delivery_date_instrument: String,
    pub agreed_delivery_date_certificate: String,
    pub manual_provided: bool,
    pub instrument_list: String,

    // Sign-off
    pub customer_signature: String,
    pub overall_remarks: String,

    // CSC-only fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csc_remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csc_internal_notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationService {
    AtLaboratory,
    AtSite,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InstrumentCondition {
    Ok,
    NotOk,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationMethod {
    AsPerWorkInstruction,
    AsPerScopeOfAccreditation,
    InAppropriate,
    OutOfDate,
}

/// Creation payload for the intake form. The CSC-only fields are not
/// accepted here at all; they enter the record through the admin endpoint.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    /// Synthesized from the creation timestamp when left empty.
    #[serde(default)]
    pub service_request_no: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub work_order_no: String,

    #[validate(length(min = 1, message = "organization name is required"))]
    pub organization_name: String,
    #[validate(length(min = 1, message = "organization address is required"))]
    pub organization_address: String,
    #[validate(length(min = 1, message = "contact person is required"))]
    pub contact_person: String,
    #[validate(length(min = 1, message = "phone number is required"))]
    pub phone_no: String,
    #[serde(default)]
    pub fax_no: String,
    #[serde(default)]
    pub mobile_no: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email_id: String,

    pub calibration_service: CalibrationService,
    #[validate(length(min = 1, message = "calibration request date is required"))]
    pub calibration_request_date: String,
    #[validate(length(min = 1, message = "target delivery date is required"))]
    pub target_delivery_date: String,
    #[serde(default)]
    pub frequency_of_calibration: String,

    pub instrument_condition: InstrumentCondition,
    pub calibration_method: CalibrationMethod,

    #[serde(default, rename = "parameterUnderNABL")]
    pub parameter_under_nabl: bool,
    #[serde(default)]
    pub statement_of_conformity: bool,

    #[serde(default)]
    pub obs_reading: String,
    #[serde(default)]
    pub mu_value: String,
    #[serde(default)]
    pub usl_value: String,
    #[serde(default)]
    pub lsl_value: String,

    #[serde(default)]
    pub difference_with_contact_tender: bool,
    #[serde(default)]
    pub difference_resolved: bool,
    #[serde(default)]
    pub contact_accepted: bool,
    #[serde(default)]
    pub deviation_from_contract: bool,
    #[serde(default)]
    pub deviation_details: String,
    #[serde(default)]
    pub contract_amended: bool,
    #[serde(default)]
    pub contract_review_repeated: bool,
    #[serde(default)]
    pub amended_contract_communicated: bool,
    #[serde(default)]
    pub clarification_asked: bool,
    #[serde(default)]
    pub witness_asked: bool,
    #[serde(default)]
    pub witness_activity: Vec<String>,

    #[serde(default)]
    pub price_as_per_price_list: String,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub delivery_mode: String,
    #[serde(default)]
    pub agreed_delivery_date_instrument: String,
    #[serde(default)]
    pub agreed_delivery_date_certificate: String,
    #[serde(default)]
    pub manual_provided: bool,
    #[serde(default)]
    pub instrument_list: String,

    #[serde(default)]
    pub customer_signature: String,
    #[serde(default)]
    pub overall_remarks: String,
}

/// Admin-only partial update of the CSC fields. `None` means "leave as is".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCscFields {
    pub csc_remarks: Option<String>,
    pub csc_internal_notes: Option<String>,
}
