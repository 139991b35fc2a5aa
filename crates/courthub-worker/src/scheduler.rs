//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use courthub_core::config::WorkerConfig;
use courthub_core::error::AppError;

use crate::sweep::LockExpirySweep;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Soft-lock expiry sweep
    sweep: Arc<LockExpirySweep>,
    /// Worker configuration
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(sweep: Arc<LockExpirySweep>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            sweep,
            config,
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_lock_sweep().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Register, start, and run until the cancel signal is received
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) -> Result<(), AppError> {
        self.register_default_tasks().await?;
        self.start().await?;

        while !*cancel.borrow() {
            if cancel.changed().await.is_err() {
                break;
            }
        }
        tracing::info!("Scheduler received shutdown signal");
        self.shutdown().await
    }

    /// Soft-lock expiry sweep, on `worker.lock_sweep_cron`
    async fn register_lock_sweep(&self) -> Result<(), AppError> {
        let sweep = Arc::clone(&self.sweep);
        let schedule = self.config.lock_sweep_cron.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                tracing::debug!("Running soft-lock expiry sweep");
                if let Err(e) = sweep.run_once(Utc::now()).await {
                    tracing::error!(error = %e, "Soft-lock expiry sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid lock sweep schedule '{schedule}': {e}"
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add lock sweep schedule: {e}")))?;

        tracing::info!(schedule = %schedule, "Registered: lock_expiry_sweep");
        Ok(())
    }
}
