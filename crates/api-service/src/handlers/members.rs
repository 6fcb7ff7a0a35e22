//! Member management handlers, tenant-scoped and authenticated the same way
//! as `handlers::admins`.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use database::{
    models::{Member, MemberId, TenantId},
    repositories,
};
use serde::Deserialize;
use shared::{AppError, PaginationParams};

use crate::{handlers::error::HandlerResult, middleware::auth::AuthContext, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub display_name: String,
    pub discord_user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub display_name: Option<String>,
    pub discord_user_id: Option<String>,
    pub email: Option<String>,
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

pub async fn list_members(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(tenant_id): Path<TenantId>,
    Query(params): Query<PaginationParams>,
) -> HandlerResult<Json<Vec<Member>>> {
    require_same_tenant(&ctx, tenant_id)?;
    let members =
        repositories::member::find_by_tenant_id(state.database().pool(), tenant_id, true, &params)
            .await?;
    Ok(Json(members))
}

pub async fn get_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((tenant_id, id)): Path<(TenantId, MemberId)>,
) -> HandlerResult<Json<Member>> {
    require_same_tenant(&ctx, tenant_id)?;
    let member = repositories::member::find_by_id(state.database().pool(), tenant_id, id).await?;
    Ok(Json(member))
}

pub async fn create_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(tenant_id): Path<TenantId>,
    Json(payload): Json<CreateMemberRequest>,
) -> HandlerResult<Json<Member>> {
    require_same_tenant(&ctx, tenant_id)?;

    let now = Utc::now();
    let member = Member {
        id: MemberId::new(),
        tenant_id,
        display_name: payload.display_name,
        discord_user_id: payload.discord_user_id,
        email: payload.email,
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    let saved = repositories::member::save(state.database().pool(), &member).await?;
    Ok(Json(saved))
}

pub async fn update_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((tenant_id, id)): Path<(TenantId, MemberId)>,
    Json(payload): Json<UpdateMemberRequest>,
) -> HandlerResult<Json<Member>> {
    require_same_tenant(&ctx, tenant_id)?;
    let existing = repositories::member::find_by_id(state.database().pool(), tenant_id, id).await?;

    let updated = Member {
        display_name: payload.display_name.unwrap_or(existing.display_name),
        discord_user_id: payload.discord_user_id.or(existing.discord_user_id),
        email: payload.email.or(existing.email),
        is_active: payload.is_active.unwrap_or(existing.is_active),
        updated_at: Utc::now(),
        ..existing
    };
    let saved = repositories::member::save(state.database().pool(), &updated).await?;
    Ok(Json(saved))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((tenant_id, id)): Path<(TenantId, MemberId)>,
) -> HandlerResult<()> {
    require_same_tenant(&ctx, tenant_id)?;
    repositories::member::delete(state.database().pool(), tenant_id, id).await?;
    Ok(())
}
