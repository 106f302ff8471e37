//! Cron-driven reminder scan scheduler.
//!
//! Periodically invokes `ReminderService::process_due_reminders` on a cron
//! schedule, decoupled from request handling. Join handles are tracked,
//! cancellation is explicit, and every asynchronous operation is wrapped in
//! a timeout. A single-flight lock keeps overlapping scans from racing each
//! other on the same pending rows.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use docket_core::ReminderService;
//! use docket_infra::scheduling::{ReminderScheduler, ReminderSchedulerConfig, SchedulerResult};
//!
//! # async fn example(service: Arc<ReminderService>) -> SchedulerResult<()> {
//! let mut scheduler = ReminderScheduler::with_config(
//!     ReminderSchedulerConfig {
//!         cron_expression: "0 * * * * *".into(), // every minute
//!         ..Default::default()
//!     },
//!     service,
//! )?;
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use docket_core::ReminderService;
use docket_domain::constants::DEFAULT_REMINDER_SCAN_CRON;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

/// Configuration for the reminder scheduler.
#[derive(Debug, Clone)]
pub struct ReminderSchedulerConfig {
    /// Cron expression describing the scan schedule.
    pub cron_expression: String,
    /// Timeout applied to a single scan execution.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for ReminderSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: DEFAULT_REMINDER_SCAN_CRON.into(),
            job_timeout: Duration::from_secs(60),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Reminder scan scheduler with explicit lifecycle management.
pub struct ReminderScheduler {
    scheduler: Option<JobScheduler>,
    config: ReminderSchedulerConfig,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    service: Arc<ReminderService>,
    scan_lock: Arc<Mutex<()>>,
}

impl ReminderScheduler {
    /// Create a scheduler with the default configuration.
    pub fn new(service: Arc<ReminderService>) -> SchedulerResult<Self> {
        Self::with_config(ReminderSchedulerConfig::default(), service)
    }

    /// Create a scheduler with a custom configuration.
    pub fn with_config(
        config: ReminderSchedulerConfig,
        service: Arc<ReminderService>,
    ) -> SchedulerResult<Self> {
        Ok(Self {
            scheduler: None,
            config,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            service,
            scan_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
            .map_err(|source| SchedulerError::StartFailed(source.to_string()))?;

        self.scheduler = Some(scheduler_instance);

        let cancel = self.cancellation.clone();
        let handle = tokio::spawn(async move {
            Self::monitor_task(cancel).await;
        });

        self.monitor_handle = Some(handle);
        info!(cron = %self.config.cron_expression, "Reminder scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        let mut scheduler = match self.scheduler.take() {
            Some(scheduler) => scheduler,
            None => return Err(SchedulerError::NotRunning),
        };

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
            .map_err(|source| SchedulerError::StopFailed(source.to_string()))?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|source| SchedulerError::TaskJoinFailed(source.to_string()))?;
        }

        info!("Reminder scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|source| SchedulerError::CreationFailed(source.to_string()))?;

        let cron_expr = self.config.cron_expression.clone();
        let service = self.service.clone();
        let scan_lock = self.scan_lock.clone();
        let job_timeout = self.config.job_timeout;

        let job_definition = Job::new_async(cron_expr.as_str(), move |_id, _lock| {
            let service = service.clone();
            let scan_lock = scan_lock.clone();

            Box::pin(async move {
                // Single-flight: an overlapping tick waits for nothing and
                // simply yields to the scan already in progress.
                let _guard = match scan_lock.try_lock() {
                    Ok(guard) => guard,
                    Err(_) => {
                        warn!("previous reminder scan still running; skipping tick");
                        return;
                    }
                };

                match tokio::time::timeout(job_timeout, service.process_due_reminders()).await {
                    Ok(Ok(sent)) => {
                        if sent > 0 {
                            info!(sent, "Reminder scan dispatched due reminders");
                        } else {
                            debug!("Reminder scan found nothing due");
                        }
                    }
                    Ok(Err(err)) => {
                        error!(error = %err, "Reminder scan failed");
                    }
                    Err(_) => {
                        warn!(
                            timeout_secs = job_timeout.as_secs(),
                            "Reminder scan timed out"
                        );
                    }
                }
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed(source.to_string()))?;

        let job_id = job_definition.guid();
        scheduler
            .add(job_definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed(source.to_string()))?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered reminder scan job");
        Ok(scheduler)
    }

    async fn monitor_task(cancel: CancellationToken) {
        cancel.cancelled().await;
        debug!("Reminder scheduler monitor cancelled");
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("ReminderScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
