//! DateSchedule and its owned children: candidate dates and member
//! responses. Mirrors `attendance`'s replace-children/response pattern.

use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{
    CandidateDate, CandidateId, DateSchedule, ScheduleId, DateScheduleResponse,
    DateScheduleStatus, MemberId, ResponseValue, ScheduleResponseId, TenantId,
};

pub async fn save(
    tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
    schedule: &DateSchedule,
    candidates: &[CandidateDate],
) -> AppResult<DateSchedule> {
    let saved = sqlx::query_as!(
        DateSchedule,
        r#"
        INSERT INTO date_schedules (id, tenant_id, name, public_token, status,
                                     decided_candidate_id, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            status = EXCLUDED.status,
            decided_candidate_id = EXCLUDED.decided_candidate_id,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, name, public_token,
                  status as "status: DateScheduleStatus",
                  decided_candidate_id, created_at, updated_at, deleted_at
        "#,
        schedule.id as ScheduleId,
        schedule.tenant_id as TenantId,
        schedule.name,
        schedule.public_token,
        schedule.status as DateScheduleStatus,
        schedule.decided_candidate_id as Option<CandidateId>,
        schedule.created_at,
        schedule.updated_at,
        schedule.deleted_at,
    )
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    sqlx::query!(
        "DELETE FROM schedule_candidates WHERE schedule_id = $1",
        saved.id as ScheduleId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for candidate in candidates {
        sqlx::query!(
            r#"
            INSERT INTO schedule_candidates (id, schedule_id, candidate_date, display_order)
            VALUES ($1, $2, $3, $4)
            "#,
            candidate.id as CandidateId,
            saved.id as ScheduleId,
            candidate.candidate_date,
            candidate.display_order,
        )
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;
    }

    Ok(saved)
}

pub async fn find_by_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    id: ScheduleId,
) -> AppResult<DateSchedule>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        DateSchedule,
        r#"
        SELECT id, tenant_id, name, public_token,
               status as "status: DateScheduleStatus",
               decided_candidate_id, created_at, updated_at, deleted_at
        FROM date_schedules WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as ScheduleId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "date schedule {id} not found in tenant {tenant_id}"
        ))
    })
}

/// Looked up by the unguessable `public_token`, the unauthenticated
/// respondent's entry point (§4.6), mirroring `attendance::find_by_public_token`.
pub async fn find_by_public_token<'e, E>(exec: E, public_token: &str) -> AppResult<DateSchedule>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        DateSchedule,
        r#"
        SELECT id, tenant_id, name, public_token,
               status as "status: DateScheduleStatus",
               decided_candidate_id, created_at, updated_at, deleted_at
        FROM date_schedules WHERE public_token = $1 AND deleted_at IS NULL
        "#,
        public_token,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound("date schedule not found".into()))
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    params: &PaginationParams,
) -> AppResult<Vec<DateSchedule>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        DateSchedule,
        r#"
        SELECT id, tenant_id, name, public_token,
               status as "status: DateScheduleStatus",
               decided_candidate_id, created_at, updated_at, deleted_at
        FROM date_schedules
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

pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: ScheduleId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let now = chrono::Utc::now();
    let result = sqlx::query!(
        r#"
        UPDATE date_schedules SET deleted_at = $3, updated_at = $3
        WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as ScheduleId,
        now,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "date schedule {id} not found in tenant {tenant_id}"
        )));
    }
    Ok(())
}

pub async fn find_candidates_by_schedule_id<'e, E>(
    exec: E,
    schedule_id: ScheduleId,
) -> AppResult<Vec<CandidateDate>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        CandidateDate,
        r#"
        SELECT id, schedule_id, candidate_date, display_order
        FROM schedule_candidates
        WHERE schedule_id = $1
        ORDER BY display_order ASC
        "#,
        schedule_id as ScheduleId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn save_response<'e, E>(
    exec: E,
    response: &DateScheduleResponse,
) -> AppResult<DateScheduleResponse>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        DateScheduleResponse,
        r#"
        INSERT INTO schedule_responses (id, tenant_id, schedule_id, member_id, candidate_id,
                                         response, responded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (schedule_id, member_id, candidate_id) DO UPDATE SET
            response = EXCLUDED.response,
            responded_at = EXCLUDED.responded_at
        RETURNING id, tenant_id, schedule_id, member_id, candidate_id,
                  response as "response: ResponseValue", responded_at
        "#,
        response.id as ScheduleResponseId,
        response.tenant_id as TenantId,
        response.schedule_id as ScheduleId,
        response.member_id as MemberId,
        response.candidate_id as CandidateId,
        response.response as ResponseValue,
        response.responded_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_responses_by_schedule_id<'e, E>(
    exec: E,
    schedule_id: ScheduleId,
) -> AppResult<Vec<DateScheduleResponse>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        DateScheduleResponse,
        r#"
        SELECT id, tenant_id, schedule_id, member_id, candidate_id,
               response as "response: ResponseValue", responded_at
        FROM schedule_responses
        WHERE schedule_id = $1
        ORDER BY responded_at ASC
        "#,
        schedule_id as ScheduleId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}
