use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::estimation::{
    EstimationEngine, InferenceError, InferenceGateway, PredictionRequest,
};
use crate::workflows::leads::domain::{
    ContactInput, Lead, LeadId, LeadStatus, OwnerId, PropertyInput, Provenance,
};
use crate::workflows::leads::normalizer::normalize_all;
use crate::workflows::leads::repository::{LeadStore, RawLeadRecord, StoreError};
use crate::workflows::leads::router::lead_router;
use crate::workflows::leads::service::LeadService;

pub(super) fn owner() -> OwnerId {
    OwnerId("owner-1".to_string())
}

pub(super) fn raw_record(id: &str, name: &str, address: &str, created_at: &str) -> RawLeadRecord {
    RawLeadRecord {
        id: id.to_string(),
        created_at: created_at.to_string(),
        name: name.to_string(),
        phone: "090-1234-5678".to_string(),
        email: "lead@example.com".to_string(),
        address: address.to_string(),
        area: 100.0,
        price: 12_000_000,
        status: Some("new".to_string()),
        ..RawLeadRecord::default()
    }
}

pub(super) fn owned_records() -> Vec<RawLeadRecord> {
    vec![
        raw_record(
            "own-1",
            "山田 太郎",
            "東京都 新宿区 西新宿",
            "2026-05-01T10:00:00Z",
        ),
        raw_record(
            "own-2",
            "佐藤 花子",
            "広島県 広島市中区 胡町",
            "2026-05-03T10:00:00Z",
        ),
    ]
}

pub(super) fn broadcast_records() -> Vec<RawLeadRecord> {
    vec![
        raw_record(
            "pub-1",
            "鈴木 一郎",
            "大阪府 大阪市北区 梅田",
            "2026-05-02T10:00:00Z",
        ),
        raw_record(
            "pub-2",
            "高橋 次郎",
            "北海道 札幌市中央区 大通西",
            "2026-05-04T10:00:00Z",
        ),
    ]
}

pub(super) fn owned_leads() -> Vec<Lead> {
    normalize_all(&owned_records(), Provenance::Owned)
}

pub(super) fn broadcast_leads() -> Vec<Lead> {
    normalize_all(&broadcast_records(), Provenance::Broadcast)
}

pub(super) fn property_input(locality: &str) -> PropertyInput {
    PropertyInput {
        region: "広島県".to_string(),
        locality: locality.to_string(),
        district: "胡町".to_string(),
        land_size: 120.0,
        frontage: 6.5,
        breadth: 18.0,
        coverage_ratio: 60.0,
        floor_area_ratio: 200.0,
    }
}

pub(super) fn contact_input() -> ContactInput {
    ContactInput {
        name: "山田 太郎".to_string(),
        phone: "090-1234-5678".to_string(),
        email: "taro@example.com".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeadStore {
    owned: Arc<Mutex<HashMap<String, Vec<RawLeadRecord>>>>,
    broadcast: Arc<Mutex<Vec<RawLeadRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryLeadStore {
    pub(super) fn seeded(owner: &OwnerId, owned: Vec<RawLeadRecord>, broadcast: Vec<RawLeadRecord>) -> Self {
        let store = Self::default();
        store
            .owned
            .lock()
            .expect("store mutex poisoned")
            .insert(owner.0.clone(), owned);
        *store.broadcast.lock().expect("store mutex poisoned") = broadcast;
        store
    }

    pub(super) fn owned_snapshot(&self, owner: &OwnerId) -> Vec<RawLeadRecord> {
        self.owned
            .lock()
            .expect("store mutex poisoned")
            .get(&owner.0)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn list_owned(&self, owner: &OwnerId) -> Result<Vec<RawLeadRecord>, StoreError> {
        Ok(self.owned_snapshot(owner))
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

/// Store wrapper that fails the configured sources, for degraded-read
/// scenarios.
pub(super) struct FailingSourceStore {
    pub(super) inner: MemoryLeadStore,
    pub(super) fail_owned: bool,
    pub(super) fail_broadcast: bool,
}

#[async_trait]
impl LeadStore for FailingSourceStore {
    async fn list_owned(&self, owner: &OwnerId) -> Result<Vec<RawLeadRecord>, StoreError> {
        if self.fail_owned {
            return Err(StoreError::Unavailable("owned store offline".to_string()));
        }
        self.inner.list_owned(owner).await
    }

    async fn list_broadcast(&self) -> Result<Vec<RawLeadRecord>, StoreError> {
        if self.fail_broadcast {
            return Err(StoreError::Unavailable("broadcast feed offline".to_string()));
        }
        self.inner.list_broadcast().await
    }

    async fn insert_owned(
        &self,
        owner: &OwnerId,
        record: RawLeadRecord,
    ) -> Result<LeadId, StoreError> {
        self.inner.insert_owned(owner, record).await
    }

    async fn update_owned_status(
        &self,
        owner: &OwnerId,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<(), StoreError> {
        self.inner.update_owned_status(owner, id, status).await
    }

    async fn delete_owned(&self, owner: &OwnerId, id: &LeadId) -> Result<(), StoreError> {
        self.inner.delete_owned(owner, id).await
    }
}

/// Gateway stub answering every prediction with a fixed price and counting
/// the calls it receives. The counter handle survives the move into the
/// engine so tests can assert on traffic afterwards.
pub(super) struct StubGateway {
    predicted_price: f64,
    calls: Arc<AtomicUsize>,
}

impl StubGateway {
    pub(super) fn with_price(predicted_price: f64) -> Self {
        Self {
            predicted_price,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::with_price(28_500_000.0)
    }
}

#[async_trait]
impl InferenceGateway for StubGateway {
    async fn predict(&self, _request: &PredictionRequest) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.predicted_price)
    }
}

pub(super) fn build_service() -> (LeadService<MemoryLeadStore, StubGateway>, MemoryLeadStore) {
    let store = MemoryLeadStore::seeded(&owner(), owned_records(), broadcast_records());
    let engine = Arc::new(EstimationEngine::new(StubGateway::default()));
    (LeadService::new(Arc::new(store.clone()), engine), store)
}

pub(super) fn router_with_seeded_service() -> axum::Router {
    let (service, _) = build_service();
    lead_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
