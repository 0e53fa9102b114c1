use axum::{extract::State, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{create_token, verify_password, AuthUser, Role},
    error::{AppError, Result},
    models::principal::{LoginRequest, LoginResponse, PrincipalProfile, RegisterRequest},
    store,
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    // Uniform failure whether the username is unknown or the password is
    // wrong: the caller must not learn which factor failed.
    let principal = store::principals::find_by_username(&state.pool, req.role, &req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &principal.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = create_token(
        principal.id,
        principal.role,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        token,
        principal: principal.into(),
    }))
}

/// Self-service registration, requester role only. A new requester is
/// authenticated immediately: the response carries a session token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let principal = store::principals::create(
        &state.pool,
        Role::Requester,
        store::principals::NewPrincipal {
            username: req.username,
            password: req.password,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await?;

    let token = create_token(
        principal.id,
        principal.role,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        token,
        principal: principal.into(),
    }))
}

/// Session tokens are client-held; ending a session means the client
/// discards its marker. The endpoint exists so clients have a single
/// logout call to make.
pub async fn logout(_auth: AuthUser) -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<PrincipalProfile>> {
    let principal = store::principals::find_by_id(&state.pool, auth.role, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Principal not found".into()))?;

    Ok(Json(principal.into()))
}
