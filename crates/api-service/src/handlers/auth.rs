//! Admin authentication: exchanges an email/password pair (scoped to a
//! tenant) for a bearer JWT. `spec.md` §1 places HTTP auth out of the
//! persistence core's scope; this is the thin edge that calls into
//! `database::repositories::admin` and `shared::utils::verify_password`.

use axum::{extract::State, response::Json};
use database::{models::TenantId, repositories};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use shared::utils::verify_password;

use crate::{handlers::error::HandlerResult, middleware::auth::Claims, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub tenant_id: TenantId,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> HandlerResult<Json<LoginResponse>> {
    let admin = repositories::admin::find_by_email(
        state.database().pool(),
        payload.tenant_id,
        &payload.email,
    )
    .await?;

    if !admin.is_active || !verify_password(&payload.password, &admin.password_hash)? {
        return Err(shared::AppError::Unauthorized("invalid credentials".into()).into());
    }

    let expiration = state.config().security.jwt_expiration;
    let claims = Claims {
        sub: admin.id,
        tenant_id: admin.tenant_id,
        role: admin.role,
        exp: (chrono::Utc::now() + chrono::Duration::seconds(expiration as i64)).timestamp(),
    };

    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config().security.jwt_secret.as_bytes()),
    )
    .map_err(|e| shared::AppError::Internal(format!("failed to sign token: {e}")))?;

    Ok(Json(LoginResponse {
        access_token,
        expires_in: expiration,
    }))
}
