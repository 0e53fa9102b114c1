use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::common::RequestStatus;

/// Simple service request as stored and served.
///
/// `id`, `userId` and `submissionTime` are assigned at creation and never
/// change; the update path strips them from any patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub submission_time: OffsetDateTime,
    pub status: RequestStatus,
    pub comments: String,
    pub personal_info: PersonalInfo,
    pub service_details: ServiceDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    #[validate(length(min = 1, message = "service type is required"))]
    pub service_type: String,
    #[validate(length(min = 10, message = "service description must be at least 10 characters long"))]
    pub description: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

/// Creation payload. Validated before any repository call; the repository
/// itself performs no validation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(nested)]
    pub personal_info: PersonalInfo,
    #[validate(nested)]
    pub service_details: ServiceDetails,
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub comments: Option<String>,
}
