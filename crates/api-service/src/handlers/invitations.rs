//! Unauthenticated-by-design endpoints that redeem a capability token:
//! accepting an admin invitation, and redeeming a license key to activate a
//! tenant. Both compose more than one repository call, so they go through
//! `services::use_cases` rather than calling `database::repositories`
//! directly (`spec.md` §4.1, §4.5).

use axum::{extract::State, response::Json};
use database::models::{Admin, Tenant, TenantId};
use serde::Deserialize;

use crate::{handlers::error::HandlerResult, services::use_cases, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    pub tenant_id: TenantId,
    pub token: String,
    pub display_name: String,
    pub password: String,
}

pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(payload): Json<AcceptInvitationRequest>,
) -> HandlerResult<Json<Admin>> {
    let admin = use_cases::accept_invitation(
        state.database(),
        payload.tenant_id,
        &payload.token,
        payload.display_name,
        &payload.password,
    )
    .await?;
    Ok(Json(admin))
}

#[derive(Debug, Deserialize)]
pub struct RedeemLicenseKeyRequest {
    pub tenant_id: TenantId,
    pub key: String,
}

pub async fn redeem_license_key(
    State(state): State<AppState>,
    Json(payload): Json<RedeemLicenseKeyRequest>,
) -> HandlerResult<Json<Tenant>> {
    let tenant = use_cases::redeem_license_key_and_activate_tenant(
        state.database(),
        payload.tenant_id,
        &payload.key,
    )
    .await?;
    Ok(Json(tenant))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> HandlerResult<Json<Admin>> {
    let admin = use_cases::reset_password(state.database(), &payload.token, &payload.new_password)
        .await?;
    Ok(Json(admin))
}
