//! Simulated workload controller
//!
//! Stands in for the external Kubernetes scaling component in the demo
//! binary and the integration tests. Knobs cover the failure semantics the
//! coordinator has to honor: call latency (to trip the bounded timeout),
//! hard failures, and slow readiness (scale up confirmed while replicas are
//! still becoming ready).

use async_trait::async_trait;
use dashmap::DashMap;
use maizter_domain::shared_kernel::{DomainError, Result, TenantId};
use maizter_domain::workload::{ScaleOutcome, WorkloadController};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Default)]
pub struct SimulatedWorkloadController {
    replicas: DashMap<TenantId, u32>,
    latency: Duration,
    failing: AtomicBool,
    slow_readiness: AtomicBool,
    calls: AtomicU64,
}

impl SimulatedWorkloadController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every scale call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every subsequent scale call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Report one replica short of ready on scale up, mimicking pods that
    /// are still starting when the scale call returns.
    pub fn set_slow_readiness(&self, slow: bool) {
        self.slow_readiness.store(slow, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn current_replicas(&self, tenant_id: &TenantId) -> u32 {
        self.replicas.get(tenant_id).map(|r| *r).unwrap_or(0)
    }
}

#[async_trait]
impl WorkloadController for SimulatedWorkloadController {
    async fn scale(&self, tenant_id: &TenantId, replicas: u32) -> Result<ScaleOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::WorkloadControllerError {
                tenant_id: tenant_id.clone(),
                message: "simulated controller failure".to_string(),
            });
        }

        self.replicas.insert(tenant_id.clone(), replicas);
        let ready_replicas = if self.slow_readiness.load(Ordering::SeqCst) {
            replicas.saturating_sub(1)
        } else {
            replicas
        };
        debug!(tenant_id = %tenant_id, replicas, ready_replicas, "Simulated scale applied");
        Ok(ScaleOutcome {
            applied_replicas: replicas,
            ready_replicas,
        })
    }
}
