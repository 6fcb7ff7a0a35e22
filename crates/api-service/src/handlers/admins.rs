//! Admin management handlers, tenant-scoped and authenticated: every route
//! here requires the bearer token's `tenant_id` (see
//! `middleware::auth::AuthContext`) to match the `:tenant_id` path segment,
//! so one tenant's admin can never read or write another tenant's admins.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use database::{
    models::{Admin, AdminId, AdminRole, TenantId},
    repositories,
};
use serde::Deserialize;
use shared::{utils::hash_password, AppError, PaginationParams};

use crate::{
    handlers::error::HandlerResult, middleware::auth::AuthContext, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: AdminRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub display_name: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

fn require_same_tenant(ctx: &AuthContext, tenant_id: TenantId) -> Result<(), AppError> {
    if ctx.tenant_id != tenant_id {
        return Err(AppError::Unauthorized(
            "token is not scoped to this tenant".into(),
        ));
    }
    Ok(())
}

pub async fn list_admins(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(tenant_id): Path<TenantId>,
    Query(params): Query<PaginationParams>,
) -> HandlerResult<Json<Vec<Admin>>> {
    require_same_tenant(&ctx, tenant_id)?;
    let admins =
        repositories::admin::find_by_tenant_id(state.database().pool(), tenant_id, true, &params)
            .await?;
    Ok(Json(admins))
}

pub async fn get_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((tenant_id, id)): Path<(TenantId, AdminId)>,
) -> HandlerResult<Json<Admin>> {
    require_same_tenant(&ctx, tenant_id)?;
    let admin = repositories::admin::find_by_id(state.database().pool(), tenant_id, id).await?;
    Ok(Json(admin))
}

/// Only an `Owner` may create further admins directly; everyone else goes
/// through `services::use_cases::accept_invitation` (`spec.md` §4.5).
pub async fn create_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(tenant_id): Path<TenantId>,
    Json(payload): Json<CreateAdminRequest>,
) -> HandlerResult<Json<Admin>> {
    require_same_tenant(&ctx, tenant_id)?;
    if !matches!(ctx.role, AdminRole::Owner) {
        return Err(AppError::Unauthorized("only an owner may create admins".into()).into());
    }

    let now = Utc::now();
    let admin = Admin {
        id: AdminId::new(),
        tenant_id,
        email: payload.email,
        password_hash: hash_password(&payload.password)?,
        display_name: payload.display_name,
        role: payload.role,
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    let saved = repositories::admin::save(state.database().pool(), &admin).await?;
    Ok(Json(saved))
}

pub async fn update_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((tenant_id, id)): Path<(TenantId, AdminId)>,
    Json(payload): Json<UpdateAdminRequest>,
) -> HandlerResult<Json<Admin>> {
    require_same_tenant(&ctx, tenant_id)?;
    let existing = repositories::admin::find_by_id(state.database().pool(), tenant_id, id).await?;

    let updated = Admin {
        display_name: payload.display_name.unwrap_or(existing.display_name),
        role: payload.role.unwrap_or(existing.role),
        is_active: payload.is_active.unwrap_or(existing.is_active),
        updated_at: Utc::now(),
        ..existing
    };
    let saved = repositories::admin::save(state.database().pool(), &updated).await?;
    Ok(Json(saved))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((tenant_id, id)): Path<(TenantId, AdminId)>,
) -> HandlerResult<()> {
    require_same_tenant(&ctx, tenant_id)?;
    repositories::admin::delete(state.database().pool(), tenant_id, id).await?;
    Ok(())
}
