//! State history log port
//!
//! Append-only, time-ordered ledger of applied transitions per tenant.
//! There are no update or delete operations, by contract.

use crate::shared_kernel::{Result, TenantId};
use crate::transition::StateTransitionRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Puerto del ledger de transiciones.
///
/// Writers go through `append` only; reads never block writers and tolerate
/// concurrent appends (a scan is consistent as of its snapshot instant,
/// which is enough because history never changes retroactively).
#[async_trait]
pub trait StateHistoryLog: Send + Sync {
    /// Append a confirmed transition. The log assigns the monotonic `id`
    /// (the record's `id` field is ignored on input) and returns the stored
    /// record.
    async fn append(&self, record: StateTransitionRecord) -> Result<StateTransitionRecord>;

    /// Latest record with `changed_at <= t`, or `None`.
    async fn most_recent_before(
        &self,
        tenant_id: &TenantId,
        t: DateTime<Utc>,
    ) -> Result<Option<StateTransitionRecord>>;

    /// Records with `changed_at` in `[start, end)`, ascending.
    async fn range_scan(
        &self,
        tenant_id: &TenantId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StateTransitionRecord>>;

    /// Most recent `limit` records, descending by `changed_at`.
    async fn recent(
        &self,
        tenant_id: &TenantId,
        limit: usize,
    ) -> Result<Vec<StateTransitionRecord>>;
}
