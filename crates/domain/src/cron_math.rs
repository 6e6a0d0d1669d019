//! Timezone-aware cron math
//!
//! Every fire instant computation in the engine goes through this module so
//! the wall-clock semantics live in exactly one place. A schedule is a
//! 5-field POSIX cron expression interpreted in the schedule's own IANA
//! timezone; the next fire instant is recomputed in UTC on every evaluation,
//! never cached across fires.
//!
//! DST policy (wall-clock local time): a local time that does not exist on a
//! spring-forward day is skipped, and a local time that occurs twice on a
//! fall-back day fires once. This follows the behaviour of the `cron`
//! iterator over a `chrono_tz::Tz`.

use crate::shared_kernel::{DomainError, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;

/// A parsed, validated schedule rule: cron expression plus IANA timezone.
///
/// Parsing is the validation step: a `CronSpec` can always produce fire
/// instants. The `cron` crate wants a seconds field, so the 5 POSIX fields
/// are prefixed with `0 ` internally; caller-facing expressions stay POSIX.
#[derive(Debug, Clone)]
pub struct CronSpec {
    schedule: Schedule,
    timezone: Tz,
}

impl CronSpec {
    pub fn parse(expression: &str, timezone: &str) -> Result<Self> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(DomainError::InvalidCronExpression {
                expression: expression.to_string(),
                reason: format!("expected 5 fields (minute hour day month weekday), got {}", fields.len()),
            });
        }

        let with_seconds = format!("0 {}", fields.join(" "));
        let schedule = Schedule::from_str(&with_seconds).map_err(|e| {
            DomainError::InvalidCronExpression {
                expression: expression.to_string(),
                reason: e.to_string(),
            }
        })?;

        let timezone = Tz::from_str(timezone).map_err(|_| DomainError::InvalidTimezone {
            timezone: timezone.to_string(),
        })?;

        Ok(Self { schedule, timezone })
    }

    /// Next fire instant strictly after `after`, in UTC.
    ///
    /// The computation is pure and stateless: the local wall-clock rule is
    /// re-evaluated in the schedule's zone against `after` on every call, so
    /// a fixed "18:00 Asia/Kolkata" schedule always lands on 12:30 UTC
    /// whatever happens to DST elsewhere. Returns `None` for expressions
    /// that can never match again.
    pub fn next_fire_utc(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
            .map(|local| local.with_timezone(&Utc))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// Validate a cron expression and timezone pair without keeping the spec.
///
/// Same check `SchedulerManager::register` performs; exposed so the CRUD
/// layer can reject bad definitions at create time, before any timer exists.
pub fn validate(expression: &str, timezone: &str) -> Result<()> {
    CronSpec::parse(expression, timezone).map(|_| ())
}
