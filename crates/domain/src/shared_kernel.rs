pub use maizter_shared::*;

use std::time::Duration;

/// Errores del dominio
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("Unknown IANA timezone: {timezone}")]
    InvalidTimezone { timezone: String },

    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Schedule not found: {schedule_id}")]
    ScheduleNotFound { schedule_id: ScheduleId },

    #[error("Schedule {schedule_id} is disabled")]
    ScheduleDisabled { schedule_id: ScheduleId },

    #[error("Workload controller failed for tenant {tenant_id}: {message}")]
    WorkloadControllerError { tenant_id: TenantId, message: String },

    #[error("Workload controller timed out for tenant {tenant_id} after {timeout:?}")]
    WorkloadControllerTimeout { tenant_id: TenantId, timeout: Duration },

    #[error("Infrastructure error: {message}")]
    InfrastructureError { message: String },
}

impl DomainError {
    /// True for schedule registration failures that must be surfaced to the
    /// CRUD caller before any timer exists.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidCronExpression { .. }
                | DomainError::InvalidTimezone { .. }
                | DomainError::InvalidMonth { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
