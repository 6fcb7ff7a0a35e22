//! Event, EventBusinessDay, ShiftSlot, ShiftSlotTemplate(+Item), and
//! ShiftAssignment repositories.

use chrono::Utc;
use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{
    AssignmentStatus, BusinessDayId, Event, EventBusinessDay, EventId, OccurrenceType,
    RecurrenceType, ShiftAssignment, ShiftSlot, ShiftSlotId, ShiftSlotTemplate,
    ShiftSlotTemplateId, ShiftSlotTemplateItem, TenantId,
};

pub async fn save<'e, E>(exec: E, event: &Event) -> AppResult<Event>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Event,
        r#"
        INSERT INTO events (id, tenant_id, event_name, event_type, description, is_active,
                             recurrence_type, recurrence_start_date, recurrence_day_of_week,
                             default_start_time, default_end_time, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (id) DO UPDATE SET
            event_name = EXCLUDED.event_name,
            event_type = EXCLUDED.event_type,
            description = EXCLUDED.description,
            is_active = EXCLUDED.is_active,
            recurrence_type = EXCLUDED.recurrence_type,
            recurrence_start_date = EXCLUDED.recurrence_start_date,
            recurrence_day_of_week = EXCLUDED.recurrence_day_of_week,
            default_start_time = EXCLUDED.default_start_time,
            default_end_time = EXCLUDED.default_end_time,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, event_name, event_type, description, is_active,
                  recurrence_type as "recurrence_type: RecurrenceType",
                  recurrence_start_date, recurrence_day_of_week,
                  default_start_time, default_end_time, created_at, updated_at, deleted_at
        "#,
        event.id as EventId,
        event.tenant_id as TenantId,
        event.event_name,
        event.event_type,
        event.description,
        event.is_active,
        event.recurrence_type as RecurrenceType,
        event.recurrence_start_date,
        event.recurrence_day_of_week,
        event.default_start_time,
        event.default_end_time,
        event.created_at,
        event.updated_at,
        event.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, tenant_id: TenantId, id: EventId) -> AppResult<Event>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Event,
        r#"
        SELECT id, tenant_id, event_name, event_type, description, is_active,
               recurrence_type as "recurrence_type: RecurrenceType",
               recurrence_start_date, recurrence_day_of_week,
               default_start_time, default_end_time, created_at, updated_at, deleted_at
        FROM events WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as EventId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("event {id} not found in tenant {tenant_id}")))
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    active_only: bool,
    params: &PaginationParams,
) -> AppResult<Vec<Event>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Event,
        r#"
        SELECT id, tenant_id, event_name, event_type, description, is_active,
               recurrence_type as "recurrence_type: RecurrenceType",
               recurrence_start_date, recurrence_day_of_week,
               default_start_time, default_end_time, created_at, updated_at, deleted_at
        FROM events
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

/// Soft-delete, per the §6 schema's `deleted_at` column on this table (see
/// the note on `Event` in `models.rs` for why this wins over §3's narrative
/// grouping of events with the hard-deleted slots/assignments).
pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: EventId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    let result = sqlx::query!(
        r#"
        UPDATE events SET deleted_at = $3, updated_at = $3
        WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as EventId,
        now,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "event {id} not found in tenant {tenant_id}"
        )));
    }
    Ok(())
}

pub mod business_day {
    use super::*;

    pub async fn save<'e, E>(exec: E, day: &EventBusinessDay) -> AppResult<EventBusinessDay>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            EventBusinessDay,
            r#"
            INSERT INTO event_business_days (id, tenant_id, event_id, target_date, start_time,
                                              end_time, occurrence_type, recurring_pattern_id,
                                              is_active, valid_from, valid_to,
                                              created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                target_date = EXCLUDED.target_date,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                occurrence_type = EXCLUDED.occurrence_type,
                recurring_pattern_id = EXCLUDED.recurring_pattern_id,
                is_active = EXCLUDED.is_active,
                valid_from = EXCLUDED.valid_from,
                valid_to = EXCLUDED.valid_to,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            RETURNING id, tenant_id, event_id, target_date, start_time, end_time,
                      occurrence_type as "occurrence_type: OccurrenceType",
                      recurring_pattern_id, is_active, valid_from, valid_to,
                      created_at, updated_at, deleted_at
            "#,
            day.id as BusinessDayId,
            day.tenant_id as TenantId,
            day.event_id as EventId,
            day.target_date,
            day.start_time,
            day.end_time,
            day.occurrence_type as OccurrenceType,
            day.recurring_pattern_id,
            day.is_active,
            day.valid_from,
            day.valid_to,
            day.created_at,
            day.updated_at,
            day.deleted_at,
        )
        .fetch_one(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    pub async fn find_by_event_id<'e, E>(
        exec: E,
        tenant_id: TenantId,
        event_id: EventId,
    ) -> AppResult<Vec<EventBusinessDay>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            EventBusinessDay,
            r#"
            SELECT id, tenant_id, event_id, target_date, start_time, end_time,
                   occurrence_type as "occurrence_type: OccurrenceType",
                   recurring_pattern_id, is_active, valid_from, valid_to,
                   created_at, updated_at, deleted_at
            FROM event_business_days
            WHERE tenant_id = $1 AND event_id = $2 AND deleted_at IS NULL
            ORDER BY target_date ASC, start_time ASC
            "#,
            tenant_id as TenantId,
            event_id as EventId,
        )
        .fetch_all(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }
}

pub mod shift_slot {
    use super::*;

    pub async fn save<'e, E>(exec: E, slot: &ShiftSlot) -> AppResult<ShiftSlot>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            ShiftSlot,
            r#"
            INSERT INTO shift_slots (id, tenant_id, business_day_id, instance_id, slot_name,
                                      instance_name, start_time, end_time, required_count,
                                      priority, created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                instance_id = EXCLUDED.instance_id,
                slot_name = EXCLUDED.slot_name,
                instance_name = EXCLUDED.instance_name,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                required_count = EXCLUDED.required_count,
                priority = EXCLUDED.priority,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            RETURNING id, tenant_id, business_day_id, instance_id, slot_name, instance_name,
                      start_time, end_time, required_count, priority,
                      created_at, updated_at, deleted_at
            "#,
            slot.id as ShiftSlotId,
            slot.tenant_id as TenantId,
            slot.business_day_id as BusinessDayId,
            slot.instance_id,
            slot.slot_name,
            slot.instance_name,
            slot.start_time,
            slot.end_time,
            slot.required_count,
            slot.priority,
            slot.created_at,
            slot.updated_at,
            slot.deleted_at,
        )
        .fetch_one(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    /// Backs the §6 `(tenant_id, business_day_id)` index.
    pub async fn find_by_business_day_id<'e, E>(
        exec: E,
        tenant_id: TenantId,
        business_day_id: BusinessDayId,
    ) -> AppResult<Vec<ShiftSlot>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            ShiftSlot,
            r#"
            SELECT id, tenant_id, business_day_id, instance_id, slot_name, instance_name,
                   start_time, end_time, required_count, priority,
                   created_at, updated_at, deleted_at
            FROM shift_slots
            WHERE tenant_id = $1 AND business_day_id = $2 AND deleted_at IS NULL
            ORDER BY start_time ASC, priority DESC
            "#,
            tenant_id as TenantId,
            business_day_id as BusinessDayId,
        )
        .fetch_all(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    /// Soft-delete — see the note on `event::delete`.
    pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: ShiftSlotId) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        let now = Utc::now();
        let result = sqlx::query!(
            r#"
            UPDATE shift_slots SET deleted_at = $3, updated_at = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
            tenant_id as TenantId,
            id as ShiftSlotId,
            now,
        )
        .execute(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "shift slot {id} not found in tenant {tenant_id}"
            )));
        }
        Ok(())
    }
}

pub mod template {
    use super::*;

    /// Upserts the root row, then replaces its item list wholesale inside
    /// the caller's transaction (§4.4): delete every item owned by this
    /// template, then bulk-insert the supplied set.
    pub async fn save(
        tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
        template: &ShiftSlotTemplate,
        items: &[ShiftSlotTemplateItem],
    ) -> AppResult<ShiftSlotTemplate> {
        let saved = sqlx::query_as!(
            ShiftSlotTemplate,
            r#"
            INSERT INTO shift_slot_templates (id, tenant_id, name, description,
                                               created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            RETURNING id, tenant_id, name, description, created_at, updated_at, deleted_at
            "#,
            template.id as ShiftSlotTemplateId,
            template.tenant_id as TenantId,
            template.name,
            template.description,
            template.created_at,
            template.updated_at,
            template.deleted_at,
        )
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        sqlx::query!(
            "DELETE FROM shift_slot_template_items WHERE template_id = $1",
            saved.id as ShiftSlotTemplateId,
        )
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        for item in items {
            sqlx::query!(
                r#"
                INSERT INTO shift_slot_template_items
                    (id, template_id, slot_name, instance_name, start_time, end_time,
                     required_count, priority, display_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
                item.id as ShiftSlotTemplateItemId,
                saved.id as ShiftSlotTemplateId,
                item.slot_name,
                item.instance_name,
                item.start_time,
                item.end_time,
                item.required_count,
                item.priority,
                item.display_order,
            )
            .execute(&mut **tx)
            .await
            .map_err(AppError::from_sqlx_classified)?;
        }

        Ok(saved)
    }

    pub async fn find_items_by_template_id<'e, E>(
        exec: E,
        template_id: ShiftSlotTemplateId,
    ) -> AppResult<Vec<ShiftSlotTemplateItem>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            ShiftSlotTemplateItem,
            r#"
            SELECT id, template_id, slot_name, instance_name, start_time, end_time,
                   required_count, priority, display_order
            FROM shift_slot_template_items
            WHERE template_id = $1
            ORDER BY display_order ASC
            "#,
            template_id as ShiftSlotTemplateId,
        )
        .fetch_all(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }
}

pub mod assignment {
    use super::*;

    /// `ON CONFLICT` target is `(slot_id, member_id) WHERE assignment_status
    /// = 'confirmed'` — a partial unique index, since cancelled assignments
    /// are retained for audit and may coexist with a later confirmed one.
    pub async fn save<'e, E>(exec: E, assignment: &ShiftAssignment) -> AppResult<ShiftAssignment>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            ShiftAssignment,
            r#"
            INSERT INTO shift_assignments (id, tenant_id, plan_id, slot_id, member_id,
                                            assignment_status, assignment_method,
                                            is_outside_preference, assigned_at, cancelled_at,
                                            created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                assignment_status = EXCLUDED.assignment_status,
                is_outside_preference = EXCLUDED.is_outside_preference,
                cancelled_at = EXCLUDED.cancelled_at,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            RETURNING id, tenant_id, plan_id, slot_id, member_id,
                      assignment_status as "assignment_status: AssignmentStatus",
                      assignment_method, is_outside_preference, assigned_at, cancelled_at,
                      created_at, updated_at, deleted_at
            "#,
            assignment.id as _,
            assignment.tenant_id as TenantId,
            assignment.plan_id,
            assignment.slot_id as _,
            assignment.member_id as _,
            assignment.assignment_status as AssignmentStatus,
            assignment.assignment_method,
            assignment.is_outside_preference,
            assignment.assigned_at,
            assignment.cancelled_at,
            assignment.created_at,
            assignment.updated_at,
            assignment.deleted_at,
        )
        .fetch_one(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    /// Backs the §6 `(tenant_id, slot_id, assignment_status)` index.
    pub async fn find_by_slot_id<'e, E>(
        exec: E,
        tenant_id: TenantId,
        slot_id: ShiftSlotId,
    ) -> AppResult<Vec<ShiftAssignment>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            ShiftAssignment,
            r#"
            SELECT id, tenant_id, plan_id, slot_id, member_id,
                   assignment_status as "assignment_status: AssignmentStatus",
                   assignment_method, is_outside_preference, assigned_at, cancelled_at,
                   created_at, updated_at, deleted_at
            FROM shift_assignments
            WHERE tenant_id = $1 AND slot_id = $2 AND deleted_at IS NULL
            ORDER BY assigned_at ASC
            "#,
            tenant_id as TenantId,
            slot_id as ShiftSlotId,
        )
        .fetch_all(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }
}
