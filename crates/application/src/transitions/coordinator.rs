//! Transition Coordinator
//!
//! The sole synchronization point of the engine. Turns a transition request
//! (manual or scheduled) into a workload controller call and, on confirmed
//! success, an append to the state history log. Guarantees at most one
//! in-flight state-changing operation per tenant; requests for different
//! tenants proceed fully in parallel.
//!
//! The only durable side effect is the history append, and it happens
//! strictly after the external scale call is confirmed. A failed or timed
//! out call leaves the log untouched.

use chrono::Utc;
use dashmap::DashMap;
use maizter_domain::shared_kernel::{DomainError, Result, TenantId, TenantState};
use maizter_domain::transition::{Actor, StateTransitionRecord};
use maizter_domain::{StateHistoryLog, WorkloadController};
use maizter_shared::EngineConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of a transition request.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The controller confirmed the change and a record was appended.
    Applied(StateTransitionRecord),
    /// Desired replicas and state already match the recorded state;
    /// nothing was called and nothing was appended.
    NoOp {
        current_state: TenantState,
        replicas: u32,
    },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

/// Coordinador de transiciones por tenant.
///
/// The per-tenant mutual-exclusion domain is an arena of lazily created
/// locks, retained for the process lifetime: a second concurrent request for
/// the same tenant queues behind the first instead of being rejected or
/// dropped.
pub struct TransitionCoordinator {
    history: Arc<dyn StateHistoryLog>,
    workload: Arc<dyn WorkloadController>,
    tenant_locks: DashMap<TenantId, Arc<Mutex<()>>>,
    workload_timeout: Duration,
}

impl TransitionCoordinator {
    pub fn new(
        history: Arc<dyn StateHistoryLog>,
        workload: Arc<dyn WorkloadController>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            history,
            workload,
            tenant_locks: DashMap::new(),
            workload_timeout: config.workload_timeout,
        }
    }

    fn lock_for(&self, tenant_id: &TenantId) -> Arc<Mutex<()>> {
        self.tenant_locks
            .entry(tenant_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Request a replica-count change for one tenant.
    ///
    /// Steps: serialize on the tenant lock, read the last recorded state,
    /// short-circuit idempotent requests, call the workload controller under
    /// a bounded timeout, and append the confirmed transition.
    pub async fn request_transition(
        &self,
        tenant_id: &TenantId,
        desired_replicas: u32,
        actor: Actor,
        reason: impl Into<String>,
    ) -> Result<TransitionOutcome> {
        let reason = reason.into();
        let lock = self.lock_for(tenant_id);
        let _guard = lock.lock().await;

        let last = self.history.recent(tenant_id, 1).await?.into_iter().next();
        let (current_state, current_replicas) = last
            .as_ref()
            .map(|r| (r.new_state, r.new_replicas))
            .unwrap_or((TenantState::Unknown, 0));

        // Idempotence: same replica count and a settled state mean there is
        // nothing to do and nothing to record. A tenant recorded as Scaling
        // is not settled (readiness may have caught up), so the call is
        // re-issued to let the controller report the current counts.
        if current_replicas == desired_replicas
            && current_state.is_known()
            && current_state != TenantState::Scaling
        {
            debug!(
                tenant_id = %tenant_id,
                state = %current_state,
                replicas = desired_replicas,
                "Transition request is a no-op"
            );
            return Ok(TransitionOutcome::NoOp {
                current_state,
                replicas: current_replicas,
            });
        }

        let outcome = tokio::time::timeout(
            self.workload_timeout,
            self.workload.scale(tenant_id, desired_replicas),
        )
        .await
        .map_err(|_| DomainError::WorkloadControllerTimeout {
            tenant_id: tenant_id.clone(),
            timeout: self.workload_timeout,
        })??;

        let new_state = TenantState::derive(outcome.applied_replicas, outcome.ready_replicas);

        // Controller reported no effective change: keep the log clean.
        if new_state == current_state && outcome.applied_replicas == current_replicas {
            return Ok(TransitionOutcome::NoOp {
                current_state,
                replicas: current_replicas,
            });
        }

        let record = StateTransitionRecord {
            id: 0, // assigned by the log
            tenant_id: tenant_id.clone(),
            previous_state: current_state,
            new_state,
            previous_replicas: current_replicas,
            new_replicas: outcome.applied_replicas,
            changed_at: Utc::now(),
            changed_by: actor,
            reason,
        };

        let stored = self.history.append(record).await?;
        info!(
            tenant_id = %tenant_id,
            from = %stored.previous_state,
            to = %stored.new_state,
            replicas = stored.new_replicas,
            actor = %stored.changed_by,
            "✅ Transition applied"
        );
        Ok(TransitionOutcome::Applied(stored))
    }

    /// Scheduled-path entry point: failures are logged and left for the next
    /// occurrence, never retried immediately.
    pub async fn request_scheduled(
        &self,
        tenant_id: &TenantId,
        desired_replicas: u32,
        reason: impl Into<String>,
    ) {
        match self
            .request_transition(tenant_id, desired_replicas, Actor::Scheduler, reason)
            .await
        {
            Ok(TransitionOutcome::Applied(record)) => {
                info!(
                    tenant_id = %tenant_id,
                    to = %record.new_state,
                    "⏰ Scheduled transition applied"
                );
            }
            Ok(TransitionOutcome::NoOp { current_state, .. }) => {
                debug!(
                    tenant_id = %tenant_id,
                    state = %current_state,
                    "⏰ Scheduled transition was a no-op"
                );
            }
            Err(e) => {
                warn!(
                    tenant_id = %tenant_id,
                    error = %e,
                    "⚠️ Scheduled transition failed; will retry at next occurrence"
                );
            }
        }
    }
}
