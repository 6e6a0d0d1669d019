//! Shared kernel for the Maizter tenant lifecycle platform.
//!
//! Tipos compartidos entre todas las capas: identificadores, estados de
//! tenant y configuración del engine.

pub mod config;
pub mod ids;
pub mod states;

pub use config::{ConfigError, EngineConfig};
pub use ids::{ScheduleId, TenantId};
pub use states::TenantState;
