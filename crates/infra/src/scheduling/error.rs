//! Scheduler error types

use docket_domain::DocketError;
use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Failed to create scheduler
    #[error("Failed to create scheduler: {0}")]
    CreationFailed(String),

    /// Failed to start scheduler
    #[error("Failed to start scheduler: {0}")]
    StartFailed(String),

    /// Failed to stop scheduler
    #[error("Failed to stop scheduler: {0}")]
    StopFailed(String),

    /// Failed to register job
    #[error("Failed to register job: {0}")]
    JobRegistrationFailed(String),

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for DocketError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                DocketError::Validation(err.to_string())
            }
            _ => DocketError::Internal(err.to_string()),
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
