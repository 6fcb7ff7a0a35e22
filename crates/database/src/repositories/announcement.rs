//! Announcement repository, including the unread-receipt fan-out that backs
//! `MarkAllAsRead` (§4.7). `tenant_id IS NULL` marks a global announcement,
//! visible to every tenant's admins.

use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{AdminId, Announcement, AnnouncementId, TenantId};

pub async fn save<'e, E>(exec: E, announcement: &Announcement) -> AppResult<Announcement>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Announcement,
        r#"
        INSERT INTO announcements (id, tenant_id, title, body, published_at,
                                    created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            body = EXCLUDED.body,
            published_at = EXCLUDED.published_at,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, title, body, published_at, created_at, updated_at, deleted_at
        "#,
        announcement.id as AnnouncementId,
        announcement.tenant_id as Option<TenantId>,
        announcement.title,
        announcement.body,
        announcement.published_at,
        announcement.created_at,
        announcement.updated_at,
        announcement.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, id: AnnouncementId) -> AppResult<Announcement>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Announcement,
        r#"
        SELECT id, tenant_id, title, body, published_at, created_at, updated_at, deleted_at
        FROM announcements WHERE id = $1 AND deleted_at IS NULL
        "#,
        id as AnnouncementId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("announcement {id} not found")))
}

/// Visible set for a tenant's admins: this tenant's own announcements plus
/// every global (`tenant_id IS NULL`) one, excluding drafts and
/// future-scheduled announcements (`published_at` unset or in the future) —
/// `spec.md` §4.7's "`published_at <= now`" clause.
pub async fn find_visible_to_tenant<'e, E>(
    exec: E,
    tenant_id: TenantId,
    params: &PaginationParams,
) -> AppResult<Vec<Announcement>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Announcement,
        r#"
        SELECT id, tenant_id, title, body, published_at, created_at, updated_at, deleted_at
        FROM announcements
        WHERE (tenant_id = $1 OR tenant_id IS NULL)
          AND deleted_at IS NULL
          AND published_at IS NOT NULL AND published_at <= now()
        ORDER BY published_at DESC NULLS LAST
        LIMIT $2 OFFSET $3
        "#,
        tenant_id as TenantId,
        limit,
        offset,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn delete<'e, E>(exec: E, id: AnnouncementId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let now = chrono::Utc::now();
    let result = sqlx::query!(
        "UPDATE announcements SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        id as AnnouncementId,
        now,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("announcement {id} not found")));
    }
    Ok(())
}

/// Marks one announcement read for one admin. Idempotent: re-reading an
/// already-read announcement is a no-op, not an error.
pub async fn mark_read<'e, E>(
    exec: E,
    announcement_id: AnnouncementId,
    admin_id: AdminId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO announcement_reads (id, announcement_id, admin_id, read_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (announcement_id, admin_id) DO NOTHING
        "#,
        crate::models::AnnouncementReadId::new() as crate::models::AnnouncementReadId,
        announcement_id as AnnouncementId,
        admin_id as AdminId,
        chrono::Utc::now(),
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

/// `MarkAllAsRead` (§4.7): finds every announcement visible to the admin's
/// tenant they haven't read, then inserts one receipt per row, same as
/// `group::set_members_of_group` loops over its member list rather than
/// generating IDs on the SQL side — IDs are minted in Rust everywhere else
/// in this crate, and a `SELECT ... gen_random_uuid()` fan-out would be the
/// one place in the system to break that.
pub async fn mark_all_read(
    tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
    tenant_id: TenantId,
    admin_id: AdminId,
) -> AppResult<u64> {
    let unread = sqlx::query!(
        r#"
        SELECT a.id as "id: AnnouncementId"
        FROM announcements a
        WHERE (a.tenant_id = $1 OR a.tenant_id IS NULL)
          AND a.deleted_at IS NULL
          AND a.published_at IS NOT NULL AND a.published_at <= now()
          AND NOT EXISTS (
              SELECT 1 FROM announcement_reads r
              WHERE r.announcement_id = a.id AND r.admin_id = $2
          )
        "#,
        tenant_id as TenantId,
        admin_id as AdminId,
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    let count = unread.len() as u64;
    for row in unread {
        mark_read(&mut **tx, row.id, admin_id).await?;
    }
    Ok(count)
}

/// `GetUnreadCount` (§4.7): announcements visible to the tenant with no
/// matching `announcement_reads` row for this admin.
pub async fn unread_count<'e, E>(exec: E, tenant_id: TenantId, admin_id: AdminId) -> AppResult<i64>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query!(
        r#"
        SELECT COUNT(*) as "count!"
        FROM announcements a
        WHERE (a.tenant_id = $1 OR a.tenant_id IS NULL)
          AND a.deleted_at IS NULL
          AND a.published_at IS NOT NULL AND a.published_at <= now()
          AND NOT EXISTS (
              SELECT 1 FROM announcement_reads r
              WHERE r.announcement_id = a.id AND r.admin_id = $2
          )
        "#,
        tenant_id as TenantId,
        admin_id as AdminId,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    Ok(row.count)
}
