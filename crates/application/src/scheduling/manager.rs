//! Cron Scheduler Engine
//!
//! `SchedulerManager` owns one pending timer per enabled schedule
//! definition. Each timer is an independent tokio task that computes the
//! next UTC fire instant from the schedule's local cron rule, sleeps until
//! it, asks the transition coordinator for the transition and reschedules.
//! Fires for distinct tenants run concurrently; a single schedule never has
//! two fires pending (the loop is sequential).
//!
//! The manager is an explicit instance with `start()`/`stop()` lifecycle,
//! injected as a dependency; there is no ambient global registry.
//!
//! Missed occurrences are never backfired: the next fire is always computed
//! from `Utc::now()`, so a process restart silently skips windows that
//! passed while it was down and arms the next future occurrence.
//!
//! `start()` performs the initial store load and `stop()` cancels every
//! timer armed so far; `register()` itself arms immediately, independent of
//! that lifecycle, so registrations arriving after `stop()` fire normally.
//!
//! Cancellation aborts the timer task outright. A task caught between
//! workload-controller confirmation and the history append loses that
//! append: the scale is applied but unrecorded until the next confirmed
//! transition re-reads the controller and brings the log back in step.

use crate::transitions::TransitionCoordinator;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use maizter_domain::cron_math::CronSpec;
use maizter_domain::schedule::{ScheduleAction, ScheduleDefinition};
use maizter_domain::schedule_store::{ScheduleStore, ScheduleStoreEvent};
use maizter_domain::shared_kernel::{Result, ScheduleId, TenantId};
use maizter_shared::EngineConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Observability snapshot of one registered schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntrySnapshot {
    pub schedule_id: ScheduleId,
    pub tenant_id: TenantId,
    pub action: ScheduleAction,
    pub cron_expression: String,
    pub timezone: String,
    pub fire_count: u64,
    pub next_fire_utc: Option<DateTime<Utc>>,
}

struct TimerHandle {
    definition: ScheduleDefinition,
    spec: CronSpec,
    fires: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

/// Registro explícito `schedule_id → timer` con ciclo de vida propio.
pub struct SchedulerManager {
    coordinator: Arc<TransitionCoordinator>,
    store: Arc<dyn ScheduleStore>,
    timers: DashMap<ScheduleId, TimerHandle>,
    // Serializes register/unregister/update so an update can never race a
    // concurrent unregister for the same id.
    mutation_lock: tokio::sync::Mutex<()>,
    running: AtomicBool,
    max_sleep: Duration,
}

impl SchedulerManager {
    pub fn new(
        coordinator: Arc<TransitionCoordinator>,
        store: Arc<dyn ScheduleStore>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            coordinator,
            store,
            timers: DashMap::new(),
            mutation_lock: tokio::sync::Mutex::new(()),
            running: AtomicBool::new(false),
            max_sleep: config.scheduler_max_sleep,
        }
    }

    /// Start the engine: poll the schedule store and arm every enabled
    /// definition. Definitions that fail validation are skipped with a
    /// warning so one bad row cannot take the whole engine down.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("SchedulerManager already started");
            return Ok(());
        }
        info!("🚀 SchedulerManager: loading schedules from store");

        let definitions = self.store.list().await?;
        let mut armed = 0usize;
        for def in definitions {
            if !def.enabled {
                continue;
            }
            let id = def.id.clone();
            match self.register(def).await {
                Ok(()) => armed += 1,
                Err(e) => warn!(schedule_id = %id, error = %e, "Skipping invalid schedule"),
            }
        }
        info!(armed, "SchedulerManager started");
        Ok(())
    }

    /// Stop the engine and cancel every timer. No schedule fires after this
    /// returns.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("SchedulerManager not running");
            return;
        }
        let _guard = self.mutation_lock.lock().await;
        let ids: Vec<ScheduleId> = self.timers.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, handle)) = self.timers.remove(&id) {
                handle.task.abort();
                let _ = handle.task.await;
            }
        }
        info!("🛑 SchedulerManager stopped");
    }

    /// Register a definition and arm its timer.
    ///
    /// Malformed cron expressions and unknown timezones are rejected here,
    /// before any timer exists. Disabled definitions are accepted but arm
    /// nothing.
    pub async fn register(&self, definition: ScheduleDefinition) -> Result<()> {
        // Validation happens outside the mutation lock: a rejected
        // definition must leave the registry untouched.
        let spec = CronSpec::parse(&definition.cron_expression, &definition.timezone)?;

        let _guard = self.mutation_lock.lock().await;
        self.remove_timer(&definition.id).await;

        if !definition.enabled {
            debug!(schedule_id = %definition.id, "Definition disabled; no timer armed");
            return Ok(());
        }

        let fires = Arc::new(AtomicU64::new(0));
        let task = self.spawn_timer(&definition, spec.clone(), fires.clone());
        info!(
            schedule_id = %definition.id,
            tenant_id = %definition.tenant_id,
            action = %definition.action,
            cron = %definition.cron_expression,
            timezone = %definition.timezone,
            "⏱️ Schedule registered"
        );
        self.timers.insert(
            definition.id.clone(),
            TimerHandle {
                definition,
                spec,
                fires,
                task,
            },
        );
        Ok(())
    }

    /// Cancel the pending timer for `schedule_id`. Idempotent; once this
    /// returns the timer task has fully terminated and cannot fire again.
    pub async fn unregister(&self, schedule_id: &ScheduleId) {
        let _guard = self.mutation_lock.lock().await;
        self.remove_timer(schedule_id).await;
    }

    /// Replace a definition: the previous timer is guaranteed canceled
    /// before the new one is armed (both happen under the mutation lock
    /// inside [`register`]).
    pub async fn update(&self, definition: ScheduleDefinition) -> Result<()> {
        self.register(definition).await
    }

    /// React to a CRUD-layer change notification.
    pub async fn handle_store_event(&self, event: ScheduleStoreEvent) -> Result<()> {
        match event {
            ScheduleStoreEvent::Created { definition }
            | ScheduleStoreEvent::Updated { definition }
            | ScheduleStoreEvent::Enabled { definition } => self.register(definition).await,
            ScheduleStoreEvent::Deleted { schedule_id }
            | ScheduleStoreEvent::Disabled { schedule_id } => {
                self.unregister(&schedule_id).await;
                Ok(())
            }
        }
    }

    /// Snapshot of every armed schedule with its next computed fire instant.
    pub fn entries(&self) -> Vec<ScheduleEntrySnapshot> {
        let now = Utc::now();
        self.timers
            .iter()
            .map(|entry| {
                let handle = entry.value();
                ScheduleEntrySnapshot {
                    schedule_id: handle.definition.id.clone(),
                    tenant_id: handle.definition.tenant_id.clone(),
                    action: handle.definition.action,
                    cron_expression: handle.definition.cron_expression.clone(),
                    timezone: handle.definition.timezone.clone(),
                    fire_count: handle.fires.load(Ordering::Relaxed),
                    next_fire_utc: handle.spec.next_fire_utc(now),
                }
            })
            .collect()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// True while the schedule's timer task is armed and alive.
    pub fn is_armed(&self, schedule_id: &ScheduleId) -> bool {
        self.timers
            .get(schedule_id)
            .map(|h| !h.task.is_finished())
            .unwrap_or(false)
    }

    async fn remove_timer(&self, schedule_id: &ScheduleId) {
        if let Some((_, handle)) = self.timers.remove(schedule_id) {
            handle.task.abort();
            // Awaiting the aborted handle is what makes cancellation
            // synchronous: after this, no fire for this id can occur.
            let _ = handle.task.await;
            debug!(schedule_id = %schedule_id, "Timer canceled");
        }
    }

    fn spawn_timer(
        &self,
        definition: &ScheduleDefinition,
        spec: CronSpec,
        fires: Arc<AtomicU64>,
    ) -> JoinHandle<()> {
        let coordinator = self.coordinator.clone();
        let tenant_id = definition.tenant_id.clone();
        let schedule_id = definition.id.clone();
        let action = definition.action;
        let max_sleep = self.max_sleep;

        tokio::spawn(Self::timer_loop(
            coordinator,
            tenant_id,
            schedule_id,
            action,
            fires,
            max_sleep,
            move |after| spec.next_fire_utc(after),
        ))
    }

    /// Body of one timer task: wait for the next occurrence, fire through
    /// the coordinator, recompute. `next_fire` is the cron math in
    /// production; tests substitute a closure to drive fires without waiting
    /// on real cron boundaries.
    async fn timer_loop<F>(
        coordinator: Arc<TransitionCoordinator>,
        tenant_id: TenantId,
        schedule_id: ScheduleId,
        action: ScheduleAction,
        fires: Arc<AtomicU64>,
        max_sleep: Duration,
        next_fire: F,
    ) where
        F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>> + Send + 'static,
    {
        loop {
            // Recomputed from "now" on every iteration: cron/timezone
            // math is stateless, and occurrences that passed while the
            // process was down or busy are skipped, not queued.
            let Some(next) = next_fire(Utc::now()) else {
                warn!(schedule_id = %schedule_id, "Schedule has no future occurrence; timer exiting");
                break;
            };

            loop {
                let remaining = next - Utc::now();
                let Ok(remaining) = remaining.to_std() else {
                    break; // fire instant reached
                };
                tokio::time::sleep(remaining.min(max_sleep)).await;
            }

            fires.fetch_add(1, Ordering::Relaxed);
            debug!(schedule_id = %schedule_id, tenant_id = %tenant_id, %action, "Schedule fired");
            coordinator
                .request_scheduled(
                    &tenant_id,
                    action.desired_replicas(),
                    format!("scheduled {}", action),
                )
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use maizter_domain::transition::Actor;
    use maizter_domain::{StateHistoryLog, WorkloadController};
    use maizter_infrastructure::{InMemoryStateHistoryLog, SimulatedWorkloadController};
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_timer_loop_fires_and_recomputes_from_a_later_instant() {
        let history = Arc::new(InMemoryStateHistoryLog::new());
        let coordinator = Arc::new(TransitionCoordinator::new(
            history.clone() as Arc<dyn StateHistoryLog>,
            Arc::new(SimulatedWorkloadController::new()) as Arc<dyn WorkloadController>,
            &EngineConfig::default(),
        ));
        let tenant = TenantId::new();
        let fires = Arc::new(AtomicU64::new(0));

        // One near-past occurrence, then exhaustion so the loop terminates.
        // Each `after` argument is recorded to observe the rearm.
        let recomputes = Arc::new(Mutex::new(Vec::new()));
        let seen = recomputes.clone();
        let next_fire = move |after: DateTime<Utc>| {
            let mut seen = seen.lock().unwrap();
            seen.push(after);
            if seen.len() == 1 {
                Some(Utc::now() + ChronoDuration::milliseconds(20))
            } else {
                None
            }
        };

        let task = tokio::spawn(SchedulerManager::timer_loop(
            coordinator,
            tenant.clone(),
            ScheduleId::new(),
            ScheduleAction::Start,
            fires.clone(),
            Duration::from_secs(3600),
            next_fire,
        ));
        task.await.unwrap();

        assert_eq!(fires.load(Ordering::Relaxed), 1);
        let records = history.recent(&tenant, 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].changed_by, Actor::Scheduler);
        assert_eq!(records[0].new_replicas, 1);

        let recomputes = recomputes.lock().unwrap();
        assert_eq!(recomputes.len(), 2);
        // the rearm starts from an instant at or past the fire, never before
        assert!(recomputes[1] > recomputes[0]);
    }
}
