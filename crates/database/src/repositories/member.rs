//! Member repository. Unique `(tenant_id, discord_user_id)` and
//! `(tenant_id, email)` among live rows.

use chrono::Utc;
use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{Member, MemberId, TenantId};

pub async fn save<'e, E>(exec: E, member: &Member) -> AppResult<Member>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Member,
        r#"
        INSERT INTO members (id, tenant_id, display_name, discord_user_id, email,
                              is_active, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            display_name = EXCLUDED.display_name,
            discord_user_id = EXCLUDED.discord_user_id,
            email = EXCLUDED.email,
            is_active = EXCLUDED.is_active,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, display_name, discord_user_id, email,
                  is_active, created_at, updated_at, deleted_at
        "#,
        member.id as MemberId,
        member.tenant_id as TenantId,
        member.display_name,
        member.discord_user_id,
        member.email,
        member.is_active,
        member.created_at,
        member.updated_at,
        member.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, tenant_id: TenantId, id: MemberId) -> AppResult<Member>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Member,
        r#"
        SELECT id, tenant_id, display_name, discord_user_id, email,
               is_active, created_at, updated_at, deleted_at
        FROM members WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as MemberId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("member {id} not found in tenant {tenant_id}")))
}

pub async fn find_by_discord_user_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    discord_user_id: &str,
) -> AppResult<Member>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Member,
        r#"
        SELECT id, tenant_id, display_name, discord_user_id, email,
               is_active, created_at, updated_at, deleted_at
        FROM members
        WHERE tenant_id = $1 AND discord_user_id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        discord_user_id,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "member with discord_user_id {discord_user_id} not found"
        ))
    })
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    active_only: bool,
    params: &PaginationParams,
) -> AppResult<Vec<Member>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Member,
        r#"
        SELECT id, tenant_id, display_name, discord_user_id, email,
               is_active, created_at, updated_at, deleted_at
        FROM members
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

pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: MemberId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        UPDATE members SET deleted_at = $3, updated_at = $3
        WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as MemberId,
        Utc::now(),
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "member {id} not found in tenant {tenant_id}"
        )));
    }
    Ok(())
}
