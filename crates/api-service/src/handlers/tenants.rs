//! Tenant management handlers. Unscoped by design — `Tenant` is the root of
//! every scoping hierarchy (`spec.md` §3), so there is no tenant_id to guard
//! these routes with; in a production deployment they would sit behind an
//! operator-only auth layer this crate does not implement.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;
use database::{
    models::{Tenant, TenantId},
    repositories,
};
use serde::Deserialize;
use shared::PaginationParams;

use crate::{handlers::error::HandlerResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub timezone: String,
}

pub async fn list_tenants(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> HandlerResult<Json<Vec<Tenant>>> {
    let tenants = repositories::tenant::find_all(state.database().pool(), &params).await?;
    Ok(Json(tenants))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
) -> HandlerResult<Json<Tenant>> {
    let tenant = repositories::tenant::find_by_id(state.database().pool(), id).await?;
    Ok(Json(tenant))
}

pub async fn create_tenant(
    State(state): State<AppState>,
    Json(payload): Json<CreateTenantRequest>,
) -> HandlerResult<Json<Tenant>> {
    let now = Utc::now();
    let tenant = Tenant {
        id: TenantId::new(),
        name: payload.name,
        timezone: payload.timezone,
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    let saved = repositories::tenant::save(state.database().pool(), &tenant).await?;
    Ok(Json(saved))
}

pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<TenantId>,
) -> HandlerResult<()> {
    repositories::tenant::delete(state.database().pool(), id).await?;
    Ok(())
}
