//! Workload controller port
//!
//! The external component that actually performs the Kubernetes scale
//! operation. Called synchronously with a bounded timeout by the transition
//! coordinator; any error or timeout is treated as failure and nothing is
//! recorded.

use crate::shared_kernel::{Result, TenantId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Replica counts reported back by the controller after a scale call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleOutcome {
    pub applied_replicas: u32,
    pub ready_replicas: u32,
}

#[async_trait]
pub trait WorkloadController: Send + Sync {
    /// Scale the tenant's workload to `replicas` and report the resulting
    /// applied/ready counts.
    async fn scale(&self, tenant_id: &TenantId, replicas: u32) -> Result<ScaleOutcome>;
}
