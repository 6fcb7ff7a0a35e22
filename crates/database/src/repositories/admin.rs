//! Admin repository. Unique `(tenant_id, email)` among non-soft-deleted rows.

use chrono::Utc;
use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{Admin, AdminId, AdminRole, TenantId};

pub async fn save<'e, E>(exec: E, admin: &Admin) -> AppResult<Admin>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Admin,
        r#"
        INSERT INTO admins (id, tenant_id, email, password_hash, display_name, role,
                             is_active, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO UPDATE SET
            email = EXCLUDED.email,
            password_hash = EXCLUDED.password_hash,
            display_name = EXCLUDED.display_name,
            role = EXCLUDED.role,
            is_active = EXCLUDED.is_active,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, email, password_hash, display_name,
                  role as "role: AdminRole", is_active, created_at, updated_at, deleted_at
        "#,
        admin.id as AdminId,
        admin.tenant_id as TenantId,
        admin.email,
        admin.password_hash,
        admin.display_name,
        admin.role as AdminRole,
        admin.is_active,
        admin.created_at,
        admin.updated_at,
        admin.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, tenant_id: TenantId, id: AdminId) -> AppResult<Admin>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Admin,
        r#"
        SELECT id, tenant_id, email, password_hash, display_name,
               role as "role: AdminRole", is_active, created_at, updated_at, deleted_at
        FROM admins WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as AdminId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("admin {id} not found in tenant {tenant_id}")))
}

/// Unified on `NotFound` for a miss, per §9 open question (ii) — the source
/// returned `(nil, nil)` here, which this rewrite deliberately does not
/// reproduce.
pub async fn find_by_email<'e, E>(exec: E, tenant_id: TenantId, email: &str) -> AppResult<Admin>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Admin,
        r#"
        SELECT id, tenant_id, email, password_hash, display_name,
               role as "role: AdminRole", is_active, created_at, updated_at, deleted_at
        FROM admins WHERE tenant_id = $1 AND email = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        email,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("admin with email {email} not found")))
}

/// Looks an admin up by ID alone, with no tenant guard — the one legitimate
/// caller is the password-reset use-case, since `password_reset_tokens`
/// carries only `admin_id` and the tenant isn't known until after the token
/// is redeemed.
pub async fn find_by_id_any_tenant<'e, E>(exec: E, id: AdminId) -> AppResult<Admin>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Admin,
        r#"
        SELECT id, tenant_id, email, password_hash, display_name,
               role as "role: AdminRole", is_active, created_at, updated_at, deleted_at
        FROM admins WHERE id = $1 AND deleted_at IS NULL
        "#,
        id as AdminId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("admin {id} not found")))
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    active_only: bool,
    params: &PaginationParams,
) -> AppResult<Vec<Admin>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Admin,
        r#"
        SELECT id, tenant_id, email, password_hash, display_name,
               role as "role: AdminRole", is_active, created_at, updated_at, deleted_at
        FROM admins
        WHERE tenant_id = $1 AND deleted_at IS NULL AND (NOT $2 OR is_active)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
        tenant_id as TenantId,
        active_only,
        limit,
        offset,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: AdminId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        UPDATE admins SET deleted_at = $3, updated_at = $3
        WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as AdminId,
        Utc::now(),
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "admin {id} not found in tenant {tenant_id}"
        )));
    }
    Ok(())
}
