//! Infrastructure adapters for the Maizter domain ports.
//!
//! Adaptadores en memoria: suficientes para el binario de demostración y
//! para los tests de integración. Durable backends plug in behind the same
//! ports.

pub mod persistence;
pub mod workload;

pub use persistence::{InMemoryScheduleStore, InMemoryStateHistoryLog};
pub use workload::SimulatedWorkloadController;
