//! Schedule definitions
//!
//! Una `ScheduleDefinition` es propiedad de la capa CRUD (schedule store);
//! el scheduler la consume y nunca la muta. The engine keeps one derived,
//! in-memory timer per enabled definition.

use crate::cron_math;
use crate::shared_kernel::{Result, ScheduleId, TenantId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action a schedule performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleAction {
    Start,
    Stop,
}

impl ScheduleAction {
    /// Replica count the action drives the tenant towards.
    pub fn desired_replicas(&self) -> u32 {
        match self {
            ScheduleAction::Start => 1,
            ScheduleAction::Stop => 0,
        }
    }
}

impl fmt::Display for ScheduleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleAction::Start => write!(f, "start"),
            ScheduleAction::Stop => write!(f, "stop"),
        }
    }
}

/// A scheduled start/stop rule for one tenant.
///
/// `cron_expression` is 5-field POSIX, interpreted as wall-clock time in
/// `timezone` (IANA name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    pub id: ScheduleId,
    pub tenant_id: TenantId,
    pub action: ScheduleAction,
    pub cron_expression: String,
    pub timezone: String,
    pub enabled: bool,
    pub description: String,
}

impl ScheduleDefinition {
    pub fn new(
        tenant_id: TenantId,
        action: ScheduleAction,
        cron_expression: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            id: ScheduleId::new(),
            tenant_id,
            action,
            cron_expression: cron_expression.into(),
            timezone: timezone.into(),
            enabled: true,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Check cron expression and timezone without arming anything.
    ///
    /// The same check `SchedulerManager::register` performs; lets the CRUD
    /// layer reject a bad definition at create/edit time.
    pub fn validate(&self) -> Result<()> {
        cron_math::validate(&self.cron_expression, &self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_kernel::DomainError;

    #[test]
    fn test_action_replicas() {
        assert_eq!(ScheduleAction::Start.desired_replicas(), 1);
        assert_eq!(ScheduleAction::Stop.desired_replicas(), 0);
    }

    #[test]
    fn test_validate_good_definition() {
        let def = ScheduleDefinition::new(
            TenantId::new(),
            ScheduleAction::Stop,
            "0 20 * * 1-5",
            "Europe/Madrid",
        );
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_cron() {
        let def = ScheduleDefinition::new(TenantId::new(), ScheduleAction::Start, "nope", "UTC");
        assert!(matches!(
            def.validate().unwrap_err(),
            DomainError::InvalidCronExpression { .. }
        ));
    }

    #[test]
    fn test_validate_bad_timezone() {
        let def = ScheduleDefinition::new(
            TenantId::new(),
            ScheduleAction::Start,
            "0 9 * * *",
            "Not/AZone",
        );
        assert!(matches!(
            def.validate().unwrap_err(),
            DomainError::InvalidTimezone { .. }
        ));
    }

    #[test]
    fn test_serde_action_names() {
        let json = serde_json::to_string(&ScheduleAction::Start).unwrap();
        assert_eq!(json, "\"start\"");
    }
}
