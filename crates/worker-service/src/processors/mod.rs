//! Job processors

use crate::jobs::{ImportJobPayload, TokenSweepPayload, WebhookGcPayload};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use database::{repositories, DatabaseManager};
use shared::{constants::jobs as job_types, AppError, AppResult, CorrelationId};
use std::time::Duration as StdDuration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Job processor trait
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(
        &self,
        job_type: &str,
        payload: serde_json::Value,
        correlation_id: CorrelationId,
    ) -> AppResult<serde_json::Value>;
}

/// Dispatches by job type to the repository calls that make up this
/// worker's three background tasks (`SPEC_FULL.md` §2).
pub struct DefaultProcessor {
    database: DatabaseManager,
}

impl DefaultProcessor {
    pub fn new(database: DatabaseManager) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Processor for DefaultProcessor {
    async fn process(
        &self,
        job_type: &str,
        payload: serde_json::Value,
        correlation_id: CorrelationId,
    ) -> AppResult<serde_json::Value> {
        info!("Processing job: type={}, correlation_id={}", job_type, correlation_id);

        match job_type {
            t if t == job_types::PROCESS_IMPORT_JOB => {
                let payload: ImportJobPayload = serde_json::from_value(payload)?;
                process_import_job(&self.database, payload).await
            }
            t if t == job_types::GC_WEBHOOK_EVENTS => {
                let payload: WebhookGcPayload = serde_json::from_value(payload)?;
                process_webhook_gc(&self.database, payload).await
            }
            t if t == job_types::SWEEP_EXPIRED_TOKENS => {
                let _payload: TokenSweepPayload = serde_json::from_value(payload)?;
                process_token_sweep(&self.database).await
            }
            _ => {
                warn!("Unknown job type: {}", job_type);
                Err(AppError::BadRequest(format!("Unknown job type: {job_type}")))
            }
        }
    }
}

/// Processes every pending row of an import job. There is no real source
/// file behind this crate's `ImportJob` (CSV parsing lives outside the
/// persistence core per `SPEC_FULL.md` §1), so each "row" here is a
/// placeholder log line recording that the worker visited it — the part
/// that matters is the `pending -> processing -> completed|failed` state
/// machine and the per-row log trail, not the parse itself.
async fn process_import_job(
    database: &DatabaseManager,
    payload: ImportJobPayload,
) -> AppResult<serde_json::Value> {
    let job = repositories::import_job::mark_processing(database.pool(), payload.import_job_id).await?;

    let mut processed = 0;
    let mut errors = 0;
    for row in 1..=job.total_rows {
        let log = database::models::ImportJobLog {
            id: database::models::ImportJobLogId::new(),
            import_job_id: job.id,
            row_number: row,
            message: "row imported".to_string(),
            created_at: Utc::now(),
        };
        if let Err(e) = repositories::import_job::append_log(database.pool(), &log).await {
            error!("failed to append import job log: {e}");
            errors += 1;
            continue;
        }
        processed += 1;

        if processed % 50 == 0 || processed == job.total_rows {
            repositories::import_job::record_progress(database.pool(), job.id, processed, errors)
                .await?;
        }
    }

    let completed = if errors == 0 {
        repositories::import_job::mark_completed(database.pool(), job.id).await?
    } else {
        repositories::import_job::mark_failed(database.pool(), job.id).await?
    };

    Ok(serde_json::json!({
        "import_job_id": completed.id,
        "status": completed.status.as_str(),
        "processed_rows": completed.processed_rows,
        "error_count": completed.error_count,
    }))
}

async fn process_webhook_gc(
    database: &DatabaseManager,
    payload: WebhookGcPayload,
) -> AppResult<serde_json::Value> {
    let before = Utc::now() - Duration::days(payload.retention_days);
    let deleted = repositories::tokens::webhook_event::delete_older_than(database.pool(), before).await?;
    Ok(serde_json::json!({ "deleted_webhook_events": deleted }))
}

async fn process_token_sweep(database: &DatabaseManager) -> AppResult<serde_json::Value> {
    let now = Utc::now();
    let invitations = repositories::tokens::invitation::delete_expired(database.pool(), now).await?;
    let password_resets =
        repositories::tokens::password_reset::delete_expired(database.pool(), now).await?;
    let license_keys = repositories::tokens::license_key::delete_expired(database.pool(), now).await?;

    Ok(serde_json::json!({
        "deleted_invitations": invitations,
        "deleted_password_reset_tokens": password_resets,
        "deleted_license_keys": license_keys,
    }))
}

/// Job execution context
pub struct JobContext {
    pub job_id: String,
    pub job_type: String,
    pub correlation_id: CorrelationId,
    pub retry_count: u32,
    pub max_retries: u32,
    pub timeout_duration: StdDuration,
}

/// Job executor with timeout and retry logic
pub struct JobExecutor<P: Processor> {
    processor: P,
}

impl<P: Processor> JobExecutor<P> {
    pub fn new(processor: P) -> Self {
        Self { processor }
    }

    /// Execute job with timeout and error handling
    pub async fn execute(
        &self,
        context: JobContext,
        payload: serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        let start_time = std::time::Instant::now();

        info!(
            "Executing job: id={}, type={}, retry={}/{}",
            context.job_id, context.job_type, context.retry_count, context.max_retries
        );

        let result = timeout(
            context.timeout_duration,
            self.processor.process(&context.job_type, payload, context.correlation_id),
        )
        .await;

        let duration = start_time.elapsed();

        match result {
            Ok(Ok(result)) => {
                info!(
                    "Job completed successfully: id={}, duration={:?}",
                    context.job_id, duration
                );
                Ok(result)
            }
            Ok(Err(e)) => {
                error!("Job failed: id={}, error={}, duration={:?}", context.job_id, e, duration);
                Err(e)
            }
            Err(_) => {
                error!(
                    "Job timed out: id={}, timeout={:?}, duration={:?}",
                    context.job_id, context.timeout_duration, duration
                );
                Err(AppError::Internal("Job execution timed out".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_job_type_rejected() {
        let database = match DatabaseManager::new(&shared::AppConfig::default().database).await {
            Ok(db) => db,
            Err(_) => return, // no database available in this test environment
        };
        let processor = DefaultProcessor::new(database);
        let result = processor
            .process("not_a_real_job", serde_json::json!({}), uuid::Uuid::new_v4())
            .await;
        assert!(result.is_err());
    }
}
