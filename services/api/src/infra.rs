use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use estate_ai::workflows::leads::{LeadId, LeadStatus, LeadStore, OwnerId, RawLeadRecord, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the service until the hosted record store is
/// wired in. Owned records are partitioned per owner; the broadcast feed is
/// a single shared list. Mutations take the record list mutex, which gives
/// the per-id atomicity the engine expects.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadStore {
    owned: Arc<Mutex<HashMap<String, Vec<RawLeadRecord>>>>,
    broadcast: Arc<Mutex<Vec<RawLeadRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryLeadStore {
    #[cfg(test)]
    pub(crate) fn seed_broadcast(&self, records: Vec<RawLeadRecord>) {
        *self.broadcast.lock().expect("store mutex poisoned") = records;
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn list_owned(&self, owner: &OwnerId) -> Result<Vec<RawLeadRecord>, StoreError> {
        Ok(self
            .owned
            .lock()
            .expect("store mutex poisoned")
            .get(&owner.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_broadcast(&self) -> Result<Vec<RawLeadRecord>, StoreError> {
        Ok(self.broadcast.lock().expect("store mutex poisoned").clone())
    }

    async fn insert_owned(
        &self,
        owner: &OwnerId,
        mut record: RawLeadRecord,
    ) -> Result<LeadId, StoreError> {
        if record.id.trim().is_empty() {
            let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
            record.id = format!("lead-{id:06}");
        }
        let id = LeadId(record.id.clone());
        self.owned
            .lock()
            .expect("store mutex poisoned")
            .entry(owner.0.clone())
            .or_default()
            .push(record);
        Ok(id)
    }

    async fn update_owned_status(
        &self,
        owner: &OwnerId,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.owned.lock().expect("store mutex poisoned");
        let records = guard.get_mut(&owner.0).ok_or(StoreError::NotFound)?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id.0)
            .ok_or(StoreError::NotFound)?;
        record.status = Some(status.label().to_string());
        Ok(())
    }

    async fn delete_owned(&self, owner: &OwnerId, id: &LeadId) -> Result<(), StoreError> {
        let mut guard = self.owned.lock().expect("store mutex poisoned");
        let records = guard.get_mut(&owner.0).ok_or(StoreError::NotFound)?;
        let before = records.len();
        records.retain(|record| record.id != id.0);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
