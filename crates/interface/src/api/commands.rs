//! Command API
//!
//! `start`, `stop` and `scale` forward to the transition coordinator and
//! return success or a typed error synchronously. Concurrency is handled
//! below this layer: a conflicting request queues behind the in-flight one,
//! it is never rejected here.

use maizter_application::{TransitionCoordinator, TransitionOutcome};
use maizter_domain::shared_kernel::{Result, TenantId, TenantState};
use maizter_domain::transition::Actor;
use serde::Serialize;
use std::sync::Arc;

/// Wire-facing outcome of a command.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    pub tenant_id: TenantId,
    pub applied: bool,
    pub state: TenantState,
    pub replicas: u32,
}

impl From<(TenantId, TransitionOutcome)> for TransitionResponse {
    fn from((tenant_id, outcome): (TenantId, TransitionOutcome)) -> Self {
        match outcome {
            TransitionOutcome::Applied(record) => Self {
                tenant_id,
                applied: true,
                state: record.new_state,
                replicas: record.new_replicas,
            },
            TransitionOutcome::NoOp {
                current_state,
                replicas,
            } => Self {
                tenant_id,
                applied: false,
                state: current_state,
                replicas,
            },
        }
    }
}

pub struct TenantCommandService {
    coordinator: Arc<TransitionCoordinator>,
}

impl TenantCommandService {
    pub fn new(coordinator: Arc<TransitionCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn start(&self, tenant_id: &TenantId, actor: Actor) -> Result<TransitionResponse> {
        self.scale(tenant_id, 1, actor).await
    }

    pub async fn stop(&self, tenant_id: &TenantId, actor: Actor) -> Result<TransitionResponse> {
        self.scale(tenant_id, 0, actor).await
    }

    pub async fn scale(
        &self,
        tenant_id: &TenantId,
        replicas: u32,
        actor: Actor,
    ) -> Result<TransitionResponse> {
        let reason = match replicas {
            0 => "manual stop".to_string(),
            1 => "manual start".to_string(),
            n => format!("manual scale to {}", n),
        };
        let outcome = self
            .coordinator
            .request_transition(tenant_id, replicas, actor, reason)
            .await?;
        Ok((tenant_id.clone(), outcome).into())
    }
}
