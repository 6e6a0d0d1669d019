//! Application layer of the Maizter tenant lifecycle engine.
//!
//! Tres servicios sobre los puertos del dominio:
//!
//! - [`scheduling::SchedulerManager`]: one derived timer per enabled
//!   schedule, timezone-correct fire instants, no backfill.
//! - [`transitions::TransitionCoordinator`]: at most one in-flight
//!   state-changing operation per tenant, append-after-confirm.
//! - [`metrics::MetricsAggregator`]: read-only uptime/downtime statistics
//!   over the state history log.

pub mod metrics;
pub mod scheduling;
pub mod transitions;

pub use metrics::{CurrentStateDuration, MetricsAggregator, MonthlyMetrics};
pub use scheduling::{ScheduleEntrySnapshot, SchedulerManager};
pub use transitions::{TransitionCoordinator, TransitionOutcome};
