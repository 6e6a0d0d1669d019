//! Metrics Bounded Context - Application Layer
//!
//! Agregación de uptime/downtime sobre el log de historial.

pub mod aggregator;

pub use aggregator::{CurrentStateDuration, MetricsAggregator, MonthlyMetrics};
