//! In-memory adapters for the history log and the schedule store.
//!
//! The history log is the real append-only ledger used by the demo binary
//! and the integration tests; the schedule store stands in for the external
//! CRUD owner of schedule definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use maizter_domain::schedule::ScheduleDefinition;
use maizter_domain::schedule_store::ScheduleStore;
use maizter_domain::shared_kernel::{Result, ScheduleId, TenantId};
use maizter_domain::transition::StateTransitionRecord;
use maizter_domain::StateHistoryLog;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only, in-memory state history log.
///
/// One vector per tenant, kept ordered by `(changed_at, id)`; ids come from
/// a log-wide counter so they are monotonic and double as the tie-break for
/// equal instants. Reads take the read half of the lock and never block
/// each other; a scan sees a consistent snapshot because records are
/// immutable once pushed.
#[derive(Clone, Default)]
pub struct InMemoryStateHistoryLog {
    records: Arc<RwLock<HashMap<TenantId, Vec<StateTransitionRecord>>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryStateHistoryLog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

#[async_trait]
impl StateHistoryLog for InMemoryStateHistoryLog {
    async fn append(&self, mut record: StateTransitionRecord) -> Result<StateTransitionRecord> {
        record.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        let tenant_records = records.entry(record.tenant_id.clone()).or_default();
        // Appends arrive in per-tenant causal order (the coordinator
        // serializes them), so pushing keeps the vector sorted; the insertion
        // search only matters for records sharing an instant across restarts.
        let position = tenant_records
            .iter()
            .rposition(|r| (r.changed_at, r.id) <= (record.changed_at, record.id))
            .map(|p| p + 1)
            .unwrap_or(0);
        tenant_records.insert(position, record.clone());
        Ok(record)
    }

    async fn most_recent_before(
        &self,
        tenant_id: &TenantId,
        t: DateTime<Utc>,
    ) -> Result<Option<StateTransitionRecord>> {
        let records = self.records.read().await;
        Ok(records.get(tenant_id).and_then(|tenant_records| {
            tenant_records
                .iter()
                .rev()
                .find(|r| r.changed_at <= t)
                .cloned()
        }))
    }

    async fn range_scan(
        &self,
        tenant_id: &TenantId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StateTransitionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .get(tenant_id)
            .map(|tenant_records| {
                tenant_records
                    .iter()
                    .filter(|r| r.changed_at >= start && r.changed_at < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn recent(
        &self,
        tenant_id: &TenantId,
        limit: usize,
    ) -> Result<Vec<StateTransitionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .get(tenant_id)
            .map(|tenant_records| {
                tenant_records.iter().rev().take(limit).cloned().collect()
            })
            .unwrap_or_default())
    }
}

/// In-memory schedule store, standing in for the external CRUD layer.
#[derive(Clone, Default)]
pub struct InMemoryScheduleStore {
    definitions: Arc<RwLock<HashMap<ScheduleId, ScheduleDefinition>>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, definition: ScheduleDefinition) {
        let mut definitions = self.definitions.write().await;
        definitions.insert(definition.id.clone(), definition);
    }

    pub async fn remove(&self, schedule_id: &ScheduleId) {
        let mut definitions = self.definitions.write().await;
        definitions.remove(schedule_id);
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn list(&self) -> Result<Vec<ScheduleDefinition>> {
        let definitions = self.definitions.read().await;
        Ok(definitions.values().cloned().collect())
    }

    async fn get(&self, schedule_id: &ScheduleId) -> Result<Option<ScheduleDefinition>> {
        let definitions = self.definitions.read().await;
        Ok(definitions.get(schedule_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use maizter_domain::shared_kernel::TenantState;
    use maizter_domain::transition::Actor;

    fn record(
        tenant_id: &TenantId,
        previous: TenantState,
        new: TenantState,
        at: DateTime<Utc>,
    ) -> StateTransitionRecord {
        StateTransitionRecord {
            id: 0,
            tenant_id: tenant_id.clone(),
            previous_state: previous,
            new_state: new,
            previous_replicas: if previous.is_up() { 1 } else { 0 },
            new_replicas: if new.is_up() { 1 } else { 0 },
            changed_at: at,
            changed_by: Actor::Scheduler,
            reason: String::new(),
        }
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_append_assigns_monotonic_ids() {
        let log = InMemoryStateHistoryLog::new();
        let tenant = TenantId::new();
        let first = log
            .append(record(&tenant, TenantState::Unknown, TenantState::Running, at(1, 0)))
            .await
            .unwrap();
        let second = log
            .append(record(&tenant, TenantState::Running, TenantState::Stopped, at(1, 10)))
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_most_recent_before() {
        let log = InMemoryStateHistoryLog::new();
        let tenant = TenantId::new();
        log.append(record(&tenant, TenantState::Unknown, TenantState::Running, at(1, 0)))
            .await
            .unwrap();
        log.append(record(&tenant, TenantState::Running, TenantState::Stopped, at(1, 10)))
            .await
            .unwrap();

        let found = log.most_recent_before(&tenant, at(1, 5)).await.unwrap().unwrap();
        assert_eq!(found.new_state, TenantState::Running);

        // boundary is inclusive
        let found = log.most_recent_before(&tenant, at(1, 10)).await.unwrap().unwrap();
        assert_eq!(found.new_state, TenantState::Stopped);

        assert!(log
            .most_recent_before(&tenant, at(1, 0) - chrono::Duration::seconds(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_range_scan_half_open() {
        let log = InMemoryStateHistoryLog::new();
        let tenant = TenantId::new();
        log.append(record(&tenant, TenantState::Unknown, TenantState::Running, at(1, 0)))
            .await
            .unwrap();
        log.append(record(&tenant, TenantState::Running, TenantState::Stopped, at(2, 0)))
            .await
            .unwrap();
        log.append(record(&tenant, TenantState::Stopped, TenantState::Running, at(3, 0)))
            .await
            .unwrap();

        let scanned = log.range_scan(&tenant, at(1, 0), at(3, 0)).await.unwrap();
        assert_eq!(scanned.len(), 2);
        assert!(scanned[0].changed_at < scanned[1].changed_at);
    }

    #[tokio::test]
    async fn test_recent_descending_with_limit() {
        let log = InMemoryStateHistoryLog::new();
        let tenant = TenantId::new();
        for day in 1..=4 {
            let (prev, new) = if day % 2 == 1 {
                (TenantState::Stopped, TenantState::Running)
            } else {
                (TenantState::Running, TenantState::Stopped)
            };
            log.append(record(&tenant, prev, new, at(day, 0))).await.unwrap();
        }
        let recent = log.recent(&tenant, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].changed_at, at(4, 0));
        assert_eq!(recent[1].changed_at, at(3, 0));
    }

    #[tokio::test]
    async fn test_unknown_tenant_reads_empty() {
        let log = InMemoryStateHistoryLog::new();
        let tenant = TenantId::new();
        assert!(log.recent(&tenant, 10).await.unwrap().is_empty());
        assert!(log.most_recent_before(&tenant, at(1, 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_schedule_store_crud() {
        let store = InMemoryScheduleStore::new();
        let def = ScheduleDefinition::new(
            TenantId::new(),
            maizter_domain::ScheduleAction::Stop,
            "0 20 * * *",
            "UTC",
        );
        let id = def.id.clone();
        store.upsert(def).await;
        assert!(store.get(&id).await.unwrap().is_some());
        assert_eq!(store.list().await.unwrap().len(), 1);
        store.remove(&id).await;
        assert!(store.get(&id).await.unwrap().is_none());
    }
}
