use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{LeadId, LeadStatus, OwnerId};

/// Wire shape of a record in either store. Upstream rows are partially
/// populated, so every optional field is lenient: a missing or malformed
/// numeric value deserializes to `0` instead of failing the whole record.
/// The estimate metadata tail feeds the remote inference features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLeadRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub area: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub price: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub frontage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub breadth: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub coverage_ratio: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub floor_area_ratio: f64,
}

fn coerce_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(number) => number.as_f64().unwrap_or(0.0),
        serde_json::Value::String(raw) => raw.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = coerce_f64(&value);
    Ok(if number.is_finite() { number } else { 0.0 })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = coerce_f64(&value);
    Ok(if number.is_finite() && number > 0.0 {
        number.round() as u64
    } else {
        0
    })
}

/// Storage abstraction over the two record sources. The owned store is
/// scoped to an explicit owner on every call; the broadcast feed is global
/// and read-only. Implementations guarantee at-least per-id atomicity for
/// the mutating calls; the engine adds no locking of its own.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn list_owned(&self, owner: &OwnerId) -> Result<Vec<RawLeadRecord>, StoreError>;
    async fn list_broadcast(&self) -> Result<Vec<RawLeadRecord>, StoreError>;
    async fn insert_owned(
        &self,
        owner: &OwnerId,
        record: RawLeadRecord,
    ) -> Result<LeadId, StoreError>;
    async fn update_owned_status(
        &self,
        owner: &OwnerId,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<(), StoreError>;
    async fn delete_owned(&self, owner: &OwnerId, id: &LeadId) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}
