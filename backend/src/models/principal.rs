use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;

/// Full principal record as stored. Holds credential material, so it is
/// never serialized to clients; responses use [`PrincipalProfile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Subset returned to the client (no credential material).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalProfile {
    pub id: Uuid,
    pub role: Role,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Principal> for PrincipalProfile {
    fn from(p: Principal) -> Self {
        PrincipalProfile {
            id: p.id,
            role: p.role,
            username: p.username,
            email: p.email,
            first_name: p.first_name,
            last_name: p.last_name,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal: PrincipalProfile,
}
