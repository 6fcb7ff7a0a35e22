//! Job scheduler

use crate::{
    config::WorkerConfig,
    processors::{DefaultProcessor, JobContext, JobExecutor},
};
use database::{repositories, DatabaseManager};
use shared::{constants::jobs as job_types, utils::generate_correlation_id, AppResult};
use std::{sync::Arc, time::Duration};
use tokio::{sync::RwLock, time::interval};
use tracing::{error, info};

/// Job scheduler for managing background job processing: pending
/// `ImportJob` rows, `WebhookEvent` retention GC, and the expired-token
/// sweep (`SPEC_FULL.md` §2).
pub struct JobScheduler {
    config: WorkerConfig,
    database: DatabaseManager,
    executor: JobExecutor<DefaultProcessor>,
    running: Arc<RwLock<bool>>,
    worker_handles: Vec<tokio::task::JoinHandle<()>>,
}

impl JobScheduler {
    /// Create a new job scheduler
    pub async fn new(
        config: shared::AppConfig,
        worker_threads: usize,
        job_types: Vec<String>,
    ) -> AppResult<Self> {
        let database = DatabaseManager::new(&config.database).await?;
        let executor = JobExecutor::new(DefaultProcessor::new(database.clone()));

        let worker_config = WorkerConfig {
            app: config,
            worker: crate::config::WorkerSettings {
                worker_threads,
                job_types,
                ..Default::default()
            },
        };

        Ok(Self {
            config: worker_config,
            database,
            executor,
            running: Arc::new(RwLock::new(false)),
            worker_handles: Vec::new(),
        })
    }

    /// Start the job scheduler
    pub async fn start(&mut self) -> AppResult<()> {
        info!("Starting job scheduler with {} worker threads", self.config.worker.worker_threads);

        {
            let mut running = self.running.write().await;
            *running = true;
        }

        for worker_id in 0..self.config.worker.worker_threads {
            let handle = self.spawn_import_job_worker(worker_id).await;
            self.worker_handles.push(handle);
        }

        let handle = self.spawn_webhook_gc_task().await;
        self.worker_handles.push(handle);

        let handle = self.spawn_token_sweep_task().await;
        self.worker_handles.push(handle);

        info!("Job scheduler started successfully");
        Ok(())
    }

    /// Stop the job scheduler
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down job scheduler");

        {
            let mut running = self.running.write().await;
            *running = false;
        }

        for handle in &self.worker_handles {
            handle.abort();
        }

        info!("Job scheduler stopped");
        Ok(())
    }

    /// Spawn a worker that polls for pending `ImportJob` rows across every
    /// tenant and drives each one through `processors::process_import_job`.
    async fn spawn_import_job_worker(&self, worker_id: usize) -> tokio::task::JoinHandle<()> {
        let config = self.config.clone();
        let database = self.database.clone();
        let executor = JobExecutor::new(DefaultProcessor::new(database.clone()));
        let running = self.running.clone();

        tokio::spawn(async move {
            info!("Import job worker {} started", worker_id);

            let mut poll_interval = interval(config.poll_interval_duration());

            loop {
                {
                    let is_running = running.read().await;
                    if !*is_running {
                        break;
                    }
                }

                poll_interval.tick().await;

                if !config.should_process_job_type(job_types::PROCESS_IMPORT_JOB) {
                    continue;
                }

                match repositories::import_job::find_pending(
                    database.pool(),
                    config.worker.batch_size as i64,
                )
                .await
                {
                    Ok(jobs) => {
                        for job in jobs {
                            let context = JobContext {
                                job_id: job.id.to_string(),
                                job_type: job_types::PROCESS_IMPORT_JOB.to_string(),
                                correlation_id: generate_correlation_id(),
                                retry_count: 0,
                                max_retries: config.worker.max_retries,
                                timeout_duration: config.job_timeout_duration(),
                            };

                            let payload = serde_json::json!({ "import_job_id": job.id });
                            if let Err(e) = executor.execute(context, payload).await {
                                error!("import job {} failed: {}", job.id, e);
                            }
                        }
                    }
                    Err(e) => {
                        error!("Failed to fetch pending import jobs: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }

            info!("Import job worker {} stopped", worker_id);
        })
    }

    /// Spawn the `WebhookEvent` retention GC task. Runs on the scheduler's
    /// cleanup cadence, reusing `cleanup_after_days` as the retention
    /// window (`spec.md` §4.5's `DeleteOlderThan`).
    async fn spawn_webhook_gc_task(&self) -> tokio::task::JoinHandle<()> {
        let config = self.config.clone();
        let database = self.database.clone();
        let executor = self.executor_for(&database);
        let running = self.running.clone();

        tokio::spawn(async move {
            info!("Webhook event GC task started");

            let mut gc_interval = interval(Duration::from_secs(3600));

            loop {
                {
                    let is_running = running.read().await;
                    if !*is_running {
                        break;
                    }
                }

                gc_interval.tick().await;

                let context = JobContext {
                    job_id: "webhook-gc".to_string(),
                    job_type: job_types::GC_WEBHOOK_EVENTS.to_string(),
                    correlation_id: generate_correlation_id(),
                    retry_count: 0,
                    max_retries: 0,
                    timeout_duration: config.job_timeout_duration(),
                };
                let payload = serde_json::json!({
                    "retention_days": config.worker.scheduler.cleanup_after_days,
                });
                if let Err(e) = executor.execute(context, payload).await {
                    error!("webhook event GC failed: {}", e);
                }
            }

            info!("Webhook event GC task stopped");
        })
    }

    /// Spawn the expired-token sweep task: invitations, password reset
    /// tokens, and unused license keys past their expiry.
    async fn spawn_token_sweep_task(&self) -> tokio::task::JoinHandle<()> {
        let config = self.config.clone();
        let database = self.database.clone();
        let executor = self.executor_for(&database);
        let running = self.running.clone();

        tokio::spawn(async move {
            info!("Token sweep task started");

            let mut sweep_interval = interval(Duration::from_secs(3600));

            loop {
                {
                    let is_running = running.read().await;
                    if !*is_running {
                        break;
                    }
                }

                sweep_interval.tick().await;

                let context = JobContext {
                    job_id: "token-sweep".to_string(),
                    job_type: job_types::SWEEP_EXPIRED_TOKENS.to_string(),
                    correlation_id: generate_correlation_id(),
                    retry_count: 0,
                    max_retries: 0,
                    timeout_duration: config.job_timeout_duration(),
                };
                if let Err(e) = executor.execute(context, serde_json::json!({})).await {
                    error!("token sweep failed: {}", e);
                }
            }

            info!("Token sweep task stopped");
        })
    }

    fn executor_for(&self, database: &DatabaseManager) -> JobExecutor<DefaultProcessor> {
        JobExecutor::new(DefaultProcessor::new(database.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_job_scheduler_creation() {
        let config = shared::AppConfig::default();

        // This test would require a running database
        // let scheduler = JobScheduler::new(config, 2, vec!["test".to_string()]).await;
        // assert!(scheduler.is_ok());
    }
}
