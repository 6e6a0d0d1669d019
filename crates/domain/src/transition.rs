//! State transition records
//!
//! Registros inmutables de transiciones aplicadas. A record exists only for
//! transitions the workload controller confirmed; attempted-but-failed
//! changes never reach the log.

use crate::shared_kernel::{TenantId, TenantState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who requested a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Actor {
    User(String),
    Scheduler,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::User(id) => write!(f, "{}", id),
            Actor::Scheduler => write!(f, "scheduler"),
        }
    }
}

/// One applied, confirmed replica-count change for a tenant.
///
/// Immutable once appended. `id` is assigned by the history log at append
/// time and is monotonic across the whole log, which doubles as the
/// tie-break for records sharing a `changed_at` instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransitionRecord {
    pub id: u64,
    pub tenant_id: TenantId,
    pub previous_state: TenantState,
    pub new_state: TenantState,
    pub previous_replicas: u32,
    pub new_replicas: u32,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Actor,
    pub reason: String,
}

impl StateTransitionRecord {
    /// Chain rule between consecutive records of the same tenant:
    /// each record must start where the previous one ended.
    pub fn follows(&self, previous: &StateTransitionRecord) -> bool {
        self.tenant_id == previous.tenant_id
            && self.previous_state == previous.new_state
            && self.previous_replicas == previous.new_replicas
            && (self.changed_at > previous.changed_at
                || (self.changed_at == previous.changed_at && self.id > previous.id))
    }
}
