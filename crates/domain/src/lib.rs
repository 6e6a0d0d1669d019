//! Domain layer of the Maizter tenant lifecycle engine.
//!
//! Contiene el modelo de dominio (definiciones de schedule, registros de
//! transición de estado) y los puertos hacia los colaboradores externos:
//! el log de historial, el workload controller y el schedule store.

pub mod cron_math;
pub mod history;
pub mod schedule;
pub mod schedule_store;
pub mod shared_kernel;
pub mod transition;
pub mod workload;

pub use history::StateHistoryLog;
pub use schedule::{ScheduleAction, ScheduleDefinition};
pub use schedule_store::{ScheduleStore, ScheduleStoreEvent};
pub use shared_kernel::{DomainError, Result};
pub use transition::{Actor, StateTransitionRecord};
pub use workload::{ScaleOutcome, WorkloadController};
