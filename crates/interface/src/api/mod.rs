pub mod commands;
pub mod queries;

pub use commands::{TenantCommandService, TransitionResponse};
pub use queries::{CurrentStatePayload, HistoryEntryPayload, MonthlyMetricsPayload, TenantQueryService};
