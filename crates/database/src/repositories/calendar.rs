//! Calendar, its manually-authored entries, and links to generated events.

use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{Calendar, CalendarEntry, CalendarEntryId, CalendarId, EventId, TenantId};

pub async fn save<'e, E>(exec: E, calendar: &Calendar) -> AppResult<Calendar>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Calendar,
        r#"
        INSERT INTO calendars (id, tenant_id, name, description, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, name, description, created_at, updated_at, deleted_at
        "#,
        calendar.id as CalendarId,
        calendar.tenant_id as TenantId,
        calendar.name,
        calendar.description,
        calendar.created_at,
        calendar.updated_at,
        calendar.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, tenant_id: TenantId, id: CalendarId) -> AppResult<Calendar>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Calendar,
        r#"
        SELECT id, tenant_id, name, description, created_at, updated_at, deleted_at
        FROM calendars WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as CalendarId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("calendar {id} not found in tenant {tenant_id}")))
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    params: &PaginationParams,
) -> AppResult<Vec<Calendar>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Calendar,
        r#"
        SELECT id, tenant_id, name, description, created_at, updated_at, deleted_at
        FROM calendars
        WHERE tenant_id = $1 AND deleted_at IS NULL
        ORDER BY created_at DESC
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

pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: CalendarId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let now = chrono::Utc::now();
    let result = sqlx::query!(
        r#"
        UPDATE calendars SET deleted_at = $3, updated_at = $3
        WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as CalendarId,
        now,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "calendar {id} not found in tenant {tenant_id}"
        )));
    }
    Ok(())
}

/// `CalendarEntry` carries no `tenant_id` of its own — it is scoped
/// transitively through `calendar_id`, so every query here takes the
/// calendar's tenant as an explicit join guard rather than a bare column.
pub async fn save_entry<'e, E>(exec: E, tenant_id: TenantId, entry: &CalendarEntry) -> AppResult<CalendarEntry>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        CalendarEntry,
        r#"
        INSERT INTO calendar_entries (id, calendar_id, event_id, title, start_at, end_at,
                                       created_at, updated_at, deleted_at)
        SELECT $1, c.id, $3, $4, $5, $6, $7, $8, $9
        FROM calendars c WHERE c.id = $2 AND c.tenant_id = $10
        ON CONFLICT (id) DO UPDATE SET
            event_id = EXCLUDED.event_id,
            title = EXCLUDED.title,
            start_at = EXCLUDED.start_at,
            end_at = EXCLUDED.end_at,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, calendar_id, event_id, title, start_at, end_at,
                  created_at, updated_at, deleted_at
        "#,
        entry.id as CalendarEntryId,
        entry.calendar_id as CalendarId,
        entry.event_id as Option<EventId>,
        entry.title,
        entry.start_at,
        entry.end_at,
        entry.created_at,
        entry.updated_at,
        entry.deleted_at,
        tenant_id as TenantId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "calendar {} not found in tenant {tenant_id}",
            entry.calendar_id
        ))
    })
}

pub async fn find_entries_by_calendar_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    calendar_id: CalendarId,
) -> AppResult<Vec<CalendarEntry>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        CalendarEntry,
        r#"
        SELECT e.id, e.calendar_id, e.event_id, e.title, e.start_at, e.end_at,
               e.created_at, e.updated_at, e.deleted_at
        FROM calendar_entries e
        JOIN calendars c ON c.id = e.calendar_id
        WHERE c.tenant_id = $1 AND e.calendar_id = $2 AND e.deleted_at IS NULL
        ORDER BY e.start_at ASC
        "#,
        tenant_id as TenantId,
        calendar_id as CalendarId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

/// Links a generated event's occurrences onto a calendar (§4.3 association
/// semantics): same-tenant join, silent no-op on cross-tenant attempt.
pub async fn link_event<'e, E>(exec: E, calendar_id: CalendarId, event_id: EventId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO calendar_event_links (calendar_id, event_id)
        SELECT c.id, e.id
        FROM calendars c
        JOIN events e ON e.tenant_id = c.tenant_id
        WHERE c.id = $1 AND e.id = $2
        ON CONFLICT DO NOTHING
        "#,
        calendar_id as CalendarId,
        event_id as EventId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

pub async fn unlink_event<'e, E>(
    exec: E,
    calendar_id: CalendarId,
    event_id: EventId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        DELETE FROM calendar_event_links cel
        USING calendars c, events e
        WHERE cel.calendar_id = c.id AND cel.event_id = e.id
          AND c.tenant_id = e.tenant_id
          AND cel.calendar_id = $1 AND cel.event_id = $2
        "#,
        calendar_id as CalendarId,
        event_id as EventId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "event {event_id} is not linked to calendar {calendar_id}"
        )));
    }
    Ok(())
}

pub async fn find_event_ids_by_calendar_id<'e, E>(
    exec: E,
    calendar_id: CalendarId,
) -> AppResult<Vec<EventId>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query!(
        "SELECT event_id FROM calendar_event_links WHERE calendar_id = $1",
        calendar_id as CalendarId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    rows.into_iter()
        .map(|r| r.event_id.parse::<EventId>())
        .collect()
}
