//! Per-admin manager permission overrides, one row per `(tenant_id, admin_id)`.

use shared::{AppError, AppResult};
use sqlx::PgExecutor;

use crate::models::{AdminId, ManagerPermissions, ManagerPermissionsId, TenantId};

pub async fn save<'e, E>(exec: E, permissions: &ManagerPermissions) -> AppResult<ManagerPermissions>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ManagerPermissions,
        r#"
        INSERT INTO manager_permissions (id, tenant_id, admin_id, permissions, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (tenant_id, admin_id) DO UPDATE SET
            permissions = EXCLUDED.permissions,
            updated_at = EXCLUDED.updated_at
        RETURNING id, tenant_id, admin_id, permissions, created_at, updated_at
        "#,
        permissions.id as ManagerPermissionsId,
        permissions.tenant_id as TenantId,
        permissions.admin_id as AdminId,
        permissions.permissions,
        permissions.created_at,
        permissions.updated_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_admin_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    admin_id: AdminId,
) -> AppResult<ManagerPermissions>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ManagerPermissions,
        r#"
        SELECT id, tenant_id, admin_id, permissions, created_at, updated_at
        FROM manager_permissions WHERE tenant_id = $1 AND admin_id = $2
        "#,
        tenant_id as TenantId,
        admin_id as AdminId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "manager permissions for admin {admin_id} not found in tenant {tenant_id}"
        ))
    })
}
