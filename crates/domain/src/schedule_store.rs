//! Schedule store port
//!
//! El schedule store es el dueño de las definiciones (CRUD externo). The
//! scheduler engine reads it on startup and reacts to its change events;
//! it never mutates a definition.

use crate::schedule::ScheduleDefinition;
use crate::shared_kernel::{Result, ScheduleId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Change notifications emitted by the CRUD layer.
///
/// Enable/disable arrive as `Updated` with the new `enabled` flag; a
/// dedicated variant pair is kept for stores that signal the flag flip
/// without shipping the whole definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum ScheduleStoreEvent {
    Created { definition: ScheduleDefinition },
    Updated { definition: ScheduleDefinition },
    Deleted { schedule_id: ScheduleId },
    Enabled { definition: ScheduleDefinition },
    Disabled { schedule_id: ScheduleId },
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// All definitions, enabled or not. Used by the startup poll.
    async fn list(&self) -> Result<Vec<ScheduleDefinition>>;

    async fn get(&self, schedule_id: &ScheduleId) -> Result<Option<ScheduleDefinition>>;
}
