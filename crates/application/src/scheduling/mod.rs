//! Scheduling Bounded Context - Application Layer
//!
//! Motor de timers derivados de las definiciones de schedule.

pub mod manager;

pub use manager::{ScheduleEntrySnapshot, SchedulerManager};
