//! Metrics Aggregator
//!
//! Read-only component over the state history log. Computes the current
//! state duration and windowed uptime/downtime/scaling statistics by
//! walking the per-tenant transition records. It never blocks writers and
//! never fails on missing history: gaps surface as `unknown` intervals that
//! are excluded from both sides of the percentage computation.

use chrono::{DateTime, TimeZone, Utc};
use maizter_domain::shared_kernel::{DomainError, Result, TenantId, TenantState};
use maizter_domain::transition::{Actor, StateTransitionRecord};
use maizter_domain::StateHistoryLog;
use serde::Serialize;
use std::sync::Arc;

/// Current state of a tenant and how long it has held it.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentStateDuration {
    pub tenant_id: TenantId,
    pub state: TenantState,
    pub duration_seconds: i64,
    pub since: Option<DateTime<Utc>>,
    pub changed_by: Option<Actor>,
}

/// Windowed uptime/downtime statistics for one calendar month.
///
/// `running` and `scaling` both count toward uptime; scaling time is also
/// reported on its own. `unknown` seconds are excluded from the percentage
/// denominator so unobserved periods do not distort the ratios.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyMetrics {
    pub tenant_id: TenantId,
    pub year: i32,
    pub month: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub downtime_seconds: i64,
    pub scaling_seconds: i64,
    pub unknown_seconds: i64,
    pub uptime_percent: f64,
    pub downtime_percent: f64,
    pub scaling_percent: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StateSeconds {
    running: i64,
    stopped: i64,
    scaling: i64,
    unknown: i64,
}

impl StateSeconds {
    fn add(&mut self, state: TenantState, seconds: i64) {
        if seconds <= 0 {
            return;
        }
        match state {
            TenantState::Running => self.running += seconds,
            TenantState::Stopped => self.stopped += seconds,
            TenantState::Scaling => self.scaling += seconds,
            TenantState::Unknown => self.unknown += seconds,
        }
    }
}

/// Walk the records of one window and accumulate the time spent in each
/// state. The previous boundary starts at `start` with `initial`; each
/// record closes the prior interval and opens a new one; `end` closes the
/// final interval. Records are expected ascending (the log contract).
fn accumulate_intervals(
    initial: TenantState,
    records: &[StateTransitionRecord],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> StateSeconds {
    let mut acc = StateSeconds::default();
    if end <= start {
        return acc;
    }
    let mut cursor = start;
    let mut state = initial;
    for record in records {
        let boundary = record.changed_at.clamp(start, end);
        acc.add(state, (boundary - cursor).num_seconds());
        cursor = boundary;
        state = record.new_state;
    }
    acc.add(state, (end - cursor).num_seconds());
    acc
}

fn month_window(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or(DomainError::InvalidMonth { year, month })?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or(DomainError::InvalidMonth { year, month })?;
    Ok((start, end))
}

fn percent(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Agregador de métricas sobre el historial de transiciones.
pub struct MetricsAggregator {
    history: Arc<dyn StateHistoryLog>,
}

impl MetricsAggregator {
    pub fn new(history: Arc<dyn StateHistoryLog>) -> Self {
        Self { history }
    }

    pub async fn current_state_duration(
        &self,
        tenant_id: &TenantId,
    ) -> Result<CurrentStateDuration> {
        self.current_state_duration_at(tenant_id, Utc::now()).await
    }

    /// Clock-injected variant, used by tests and by callers replaying a
    /// point in time.
    pub async fn current_state_duration_at(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<CurrentStateDuration> {
        let last = self.history.recent(tenant_id, 1).await?.into_iter().next();
        Ok(match last {
            Some(record) => CurrentStateDuration {
                tenant_id: tenant_id.clone(),
                state: record.new_state,
                duration_seconds: (now - record.changed_at).num_seconds().max(0),
                since: Some(record.changed_at),
                changed_by: Some(record.changed_by),
            },
            None => CurrentStateDuration {
                tenant_id: tenant_id.clone(),
                state: TenantState::Unknown,
                duration_seconds: 0,
                since: None,
                changed_by: None,
            },
        })
    }

    pub async fn monthly_metrics(
        &self,
        tenant_id: &TenantId,
        year: i32,
        month: u32,
    ) -> Result<MonthlyMetrics> {
        self.monthly_metrics_at(tenant_id, year, month, Utc::now())
            .await
    }

    pub async fn monthly_metrics_at(
        &self,
        tenant_id: &TenantId,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> Result<MonthlyMetrics> {
        let (window_start, month_end) = month_window(year, month)?;
        // Current month is a partial window; past months are full. A window
        // entirely in the future yields zero elapsed time and all-zero
        // metrics rather than a division by zero.
        let window_end = month_end.min(now);

        let initial_state = self
            .history
            .most_recent_before(tenant_id, window_start)
            .await?
            .map(|r| r.new_state)
            .unwrap_or(TenantState::Unknown);

        let records = if window_end > window_start {
            self.history
                .range_scan(tenant_id, window_start, window_end)
                .await?
        } else {
            Vec::new()
        };

        let seconds = accumulate_intervals(initial_state, &records, window_start, window_end);
        let uptime = seconds.running + seconds.scaling;
        let downtime = seconds.stopped;
        // Unknown time is unobserved, not downtime: it leaves the
        // denominator entirely.
        let elapsed = (window_end - window_start).num_seconds().max(0) - seconds.unknown;

        Ok(MonthlyMetrics {
            tenant_id: tenant_id.clone(),
            year,
            month,
            window_start,
            window_end: window_end.max(window_start),
            uptime_seconds: uptime,
            downtime_seconds: downtime,
            scaling_seconds: seconds.scaling,
            unknown_seconds: seconds.unknown,
            uptime_percent: percent(uptime, elapsed),
            downtime_percent: percent(downtime, elapsed),
            scaling_percent: percent(seconds.scaling, elapsed),
        })
    }

    /// Most recent `limit` records, descending by `changed_at`.
    pub async fn history(
        &self,
        tenant_id: &TenantId,
        limit: usize,
    ) -> Result<Vec<StateTransitionRecord>> {
        self.history.recent(tenant_id, limit).await
    }
}
