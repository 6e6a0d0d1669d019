//! Query API
//!
//! Read-only payloads for the dashboard: current state with its duration,
//! monthly uptime metrics and the transition history.

use chrono::{DateTime, Utc};
use maizter_application::metrics::{CurrentStateDuration, MetricsAggregator, MonthlyMetrics};
use maizter_domain::shared_kernel::{Result, TenantId, TenantState};
use maizter_domain::transition::StateTransitionRecord;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct CurrentStatePayload {
    pub tenant_id: TenantId,
    pub state: TenantState,
    pub duration_seconds: i64,
    pub since: Option<DateTime<Utc>>,
    pub changed_by: Option<String>,
}

impl From<CurrentStateDuration> for CurrentStatePayload {
    fn from(value: CurrentStateDuration) -> Self {
        Self {
            tenant_id: value.tenant_id,
            state: value.state,
            duration_seconds: value.duration_seconds,
            since: value.since,
            changed_by: value.changed_by.map(|a| a.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyMetricsPayload {
    pub tenant_id: TenantId,
    pub year: i32,
    pub month: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub downtime_seconds: i64,
    pub scaling_seconds: i64,
    pub uptime_percent: f64,
    pub downtime_percent: f64,
    pub scaling_percent: f64,
}

impl From<MonthlyMetrics> for MonthlyMetricsPayload {
    fn from(value: MonthlyMetrics) -> Self {
        Self {
            tenant_id: value.tenant_id,
            year: value.year,
            month: value.month,
            window_start: value.window_start,
            window_end: value.window_end,
            uptime_seconds: value.uptime_seconds,
            downtime_seconds: value.downtime_seconds,
            scaling_seconds: value.scaling_seconds,
            uptime_percent: value.uptime_percent,
            downtime_percent: value.downtime_percent,
            scaling_percent: value.scaling_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryPayload {
    pub id: u64,
    pub previous_state: TenantState,
    pub new_state: TenantState,
    pub previous_replicas: u32,
    pub new_replicas: u32,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
    pub reason: String,
}

impl From<StateTransitionRecord> for HistoryEntryPayload {
    fn from(record: StateTransitionRecord) -> Self {
        Self {
            id: record.id,
            previous_state: record.previous_state,
            new_state: record.new_state,
            previous_replicas: record.previous_replicas,
            new_replicas: record.new_replicas,
            changed_at: record.changed_at,
            changed_by: record.changed_by.to_string(),
            reason: record.reason,
        }
    }
}

pub struct TenantQueryService {
    aggregator: Arc<MetricsAggregator>,
    default_history_limit: usize,
}

impl TenantQueryService {
    pub fn new(aggregator: Arc<MetricsAggregator>, default_history_limit: usize) -> Self {
        Self {
            aggregator,
            default_history_limit,
        }
    }

    pub async fn current_state(&self, tenant_id: &TenantId) -> Result<CurrentStatePayload> {
        Ok(self.aggregator.current_state_duration(tenant_id).await?.into())
    }

    pub async fn monthly_metrics(
        &self,
        tenant_id: &TenantId,
        year: i32,
        month: u32,
    ) -> Result<MonthlyMetricsPayload> {
        Ok(self
            .aggregator
            .monthly_metrics(tenant_id, year, month)
            .await?
            .into())
    }

    pub async fn history(
        &self,
        tenant_id: &TenantId,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntryPayload>> {
        let limit = limit.unwrap_or(self.default_history_limit);
        Ok(self
            .aggregator
            .history(tenant_id, limit)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maizter_domain::transition::Actor;

    #[test]
    fn test_current_state_payload_actor_serialization() {
        let payload: CurrentStatePayload = CurrentStateDuration {
            tenant_id: TenantId::new(),
            state: TenantState::Running,
            duration_seconds: 42,
            since: Some(Utc::now()),
            changed_by: Some(Actor::Scheduler),
        }
        .into();
        assert_eq!(payload.changed_by.as_deref(), Some("scheduler"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["duration_seconds"], 42);
    }
}
