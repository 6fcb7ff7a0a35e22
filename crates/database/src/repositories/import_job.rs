//! Bulk-import jobs (§4.8): `pending -> processing -> (completed | failed)`,
//! plus the per-row log lines a worker appends as it walks the source file.

use chrono::Utc;
use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{ImportJob, ImportJobId, ImportJobLog, ImportJobLogId, ImportJobStatus, TenantId};

pub async fn save<'e, E>(exec: E, job: &ImportJob) -> AppResult<ImportJob>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJob,
        r#"
        INSERT INTO import_jobs (id, tenant_id, status, source_filename, total_rows,
                                  processed_rows, error_count, created_at, updated_at, completed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO UPDATE SET
            status = EXCLUDED.status,
            total_rows = EXCLUDED.total_rows,
            processed_rows = EXCLUDED.processed_rows,
            error_count = EXCLUDED.error_count,
            updated_at = EXCLUDED.updated_at,
            completed_at = EXCLUDED.completed_at
        RETURNING id, tenant_id, status as "status: ImportJobStatus", source_filename,
                  total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        "#,
        job.id as ImportJobId,
        job.tenant_id as TenantId,
        job.status as ImportJobStatus,
        job.source_filename,
        job.total_rows,
        job.processed_rows,
        job.error_count,
        job.created_at,
        job.updated_at,
        job.completed_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, tenant_id: TenantId, id: ImportJobId) -> AppResult<ImportJob>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJob,
        r#"
        SELECT id, tenant_id, status as "status: ImportJobStatus", source_filename,
               total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        FROM import_jobs WHERE tenant_id = $1 AND id = $2
        "#,
        tenant_id as TenantId,
        id as ImportJobId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("import job {id} not found in tenant {tenant_id}")))
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    params: &PaginationParams,
) -> AppResult<Vec<ImportJob>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        ImportJob,
        r#"
        SELECT id, tenant_id, status as "status: ImportJobStatus", source_filename,
               total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        FROM import_jobs
        WHERE tenant_id = $1
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

/// Jobs due for a worker to pick up, oldest first, across every tenant —
/// the worker poll loop is the one caller that legitimately needs to see
/// past tenant scoping, since it is infrastructure, not a tenant operator.
pub async fn find_pending<'e, E>(exec: E, limit: i64) -> AppResult<Vec<ImportJob>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJob,
        r#"
        SELECT id, tenant_id, status as "status: ImportJobStatus", source_filename,
               total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        FROM import_jobs
        WHERE status = 'pending'
        ORDER BY created_at ASC
        LIMIT $1
        "#,
        limit,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

/// `pending -> processing`. Rejects a job already past `pending`, so a
/// worker that picks up the same job twice (e.g. after a redelivered queue
/// message) fails the second transition instead of double-processing.
pub async fn mark_processing<'e, E>(exec: E, id: ImportJobId) -> AppResult<ImportJob>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJob,
        r#"
        UPDATE import_jobs SET status = 'processing', updated_at = $2
        WHERE id = $1 AND status = 'pending'
        RETURNING id, tenant_id, status as "status: ImportJobStatus", source_filename,
                  total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        "#,
        id as ImportJobId,
        Utc::now(),
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::Conflict(format!("import job {id} is not pending")))
}

/// Advances the running row counters. Called once per processed row (or in
/// small batches) while a job sits in `processing`.
pub async fn record_progress<'e, E>(
    exec: E,
    id: ImportJobId,
    processed_rows: i32,
    error_count: i32,
) -> AppResult<ImportJob>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJob,
        r#"
        UPDATE import_jobs SET processed_rows = $2, error_count = $3, updated_at = $4
        WHERE id = $1
        RETURNING id, tenant_id, status as "status: ImportJobStatus", source_filename,
                  total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        "#,
        id as ImportJobId,
        processed_rows,
        error_count,
        Utc::now(),
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("import job {id} not found")))
}

/// `processing -> completed`.
pub async fn mark_completed<'e, E>(exec: E, id: ImportJobId) -> AppResult<ImportJob>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_as!(
        ImportJob,
        r#"
        UPDATE import_jobs SET status = 'completed', updated_at = $2, completed_at = $2
        WHERE id = $1 AND status = 'processing'
        RETURNING id, tenant_id, status as "status: ImportJobStatus", source_filename,
                  total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        "#,
        id as ImportJobId,
        now,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::Conflict(format!("import job {id} is not processing")))
}

/// `processing -> failed`. Unlike `mark_completed`, this transition is
/// allowed from `pending` too, so a job that dies before its first row can
/// still be marked failed rather than stuck.
pub async fn mark_failed<'e, E>(exec: E, id: ImportJobId) -> AppResult<ImportJob>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_as!(
        ImportJob,
        r#"
        UPDATE import_jobs SET status = 'failed', updated_at = $2, completed_at = $2
        WHERE id = $1 AND status IN ('pending', 'processing')
        RETURNING id, tenant_id, status as "status: ImportJobStatus", source_filename,
                  total_rows, processed_rows, error_count, created_at, updated_at, completed_at
        "#,
        id as ImportJobId,
        now,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::Conflict(format!("import job {id} cannot be failed from its current state")))
}

pub async fn append_log<'e, E>(exec: E, log: &ImportJobLog) -> AppResult<ImportJobLog>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJobLog,
        r#"
        INSERT INTO import_job_logs (id, import_job_id, row_number, message, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, import_job_id, row_number, message, created_at
        "#,
        log.id as ImportJobLogId,
        log.import_job_id as ImportJobId,
        log.row_number,
        log.message,
        log.created_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_logs_by_job_id<'e, E>(
    exec: E,
    import_job_id: ImportJobId,
) -> AppResult<Vec<ImportJobLog>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        ImportJobLog,
        r#"
        SELECT id, import_job_id, row_number, message, created_at
        FROM import_job_logs
        WHERE import_job_id = $1
        ORDER BY row_number ASC
        "#,
        import_job_id as ImportJobId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}
