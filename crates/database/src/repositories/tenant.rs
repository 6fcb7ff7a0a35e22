//! Tenant repository. `Tenant` is the root of every scoping hierarchy, so
//! unlike every other repository in this module its functions do not take
//! a `tenant_id` — the tenant IS the id.

use chrono::Utc;
use shared::{AppError, AppResult};
use sqlx::PgExecutor;

use crate::models::{Tenant, TenantId};

/// Upsert by primary key (§4.2). The `ON CONFLICT` branch updates only
/// mutable columns — never `id` or `created_at` — and takes `updated_at`
/// from the aggregate, not `NOW()`, so the domain clock drives ordering.
pub async fn save<'e, E>(exec: E, tenant: &Tenant) -> AppResult<Tenant>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Tenant,
        r#"
        INSERT INTO tenants (id, name, timezone, is_active, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            timezone = EXCLUDED.timezone,
            is_active = EXCLUDED.is_active,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, name, timezone, is_active, created_at, updated_at, deleted_at
        "#,
        tenant.id as TenantId,
        tenant.name,
        tenant.timezone,
        tenant.is_active,
        tenant.created_at,
        tenant.updated_at,
        tenant.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, id: TenantId) -> AppResult<Tenant>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Tenant,
        r#"
        SELECT id, name, timezone, is_active, created_at, updated_at, deleted_at
        FROM tenants WHERE id = $1 AND deleted_at IS NULL
        "#,
        id as TenantId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("tenant {id} not found")))
}

pub async fn find_all<'e, E>(exec: E, params: &shared::PaginationParams) -> AppResult<Vec<Tenant>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Tenant,
        r#"
        SELECT id, name, timezone, is_active, created_at, updated_at, deleted_at
        FROM tenants WHERE deleted_at IS NULL
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
        limit,
        offset,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

/// Soft-delete only — a tenant is "root of every scoping hierarchy. Never
/// deleted (hard)" (`spec.md` §3).
pub async fn delete<'e, E>(exec: E, id: TenantId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        "UPDATE tenants SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        id as TenantId,
        Utc::now(),
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("tenant {id} not found")));
    }
    Ok(())
}
