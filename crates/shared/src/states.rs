use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estados posibles de un tenant
///
/// The state is derived, never stored on its own: it is a pure function of
/// the desired and ready replica counts reported by the workload controller.
/// `Unknown` is the sole initial state and is never re-entered once a tenant
/// has any recorded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantState {
    Unknown,
    Running,
    Stopped,
    Scaling,
}

impl TenantState {
    /// Deriva el estado a partir de los contadores de réplicas
    ///
    /// - `Stopped` when desired = 0
    /// - `Scaling` when desired ≥ 1 and ready < desired
    /// - `Running` when desired ≥ 1 and fully ready
    pub fn derive(desired_replicas: u32, ready_replicas: u32) -> Self {
        if desired_replicas == 0 {
            TenantState::Stopped
        } else if ready_replicas < desired_replicas {
            TenantState::Scaling
        } else {
            TenantState::Running
        }
    }

    /// Retorna true si el estado cuenta como uptime
    pub fn is_up(&self) -> bool {
        matches!(self, TenantState::Running | TenantState::Scaling)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TenantState::Unknown)
    }
}

impl fmt::Display for TenantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantState::Unknown => write!(f, "UNKNOWN"),
            TenantState::Running => write!(f, "RUNNING"),
            TenantState::Stopped => write!(f, "STOPPED"),
            TenantState::Scaling => write!(f, "SCALING"),
        }
    }
}

impl FromStr for TenantState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(TenantState::Unknown),
            "RUNNING" => Ok(TenantState::Running),
            "STOPPED" => Ok(TenantState::Stopped),
            "SCALING" => Ok(TenantState::Scaling),
            _ => Err(format!("Invalid TenantState: {}", s)),
        }
    }
}

impl TryFrom<i32> for TenantState {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TenantState::Unknown),
            1 => Ok(TenantState::Running),
            2 => Ok(TenantState::Stopped),
            3 => Ok(TenantState::Scaling),
            _ => Err(format!("Invalid TenantState value: {}", value)),
        }
    }
}

impl From<&TenantState> for i32 {
    fn from(state: &TenantState) -> Self {
        match state {
            TenantState::Unknown => 0,
            TenantState::Running => 1,
            TenantState::Stopped => 2,
            TenantState::Scaling => 3,
        }
    }
}
