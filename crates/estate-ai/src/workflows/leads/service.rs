use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use super::aggregator::{count_by_status, filter, MergedLeads, StatusCounts, StatusFilter};
use super::domain::{
    ContactInput, Lead, LeadId, LeadOperation, LeadStatus, OwnerId, PropertyInput, Provenance,
    ValidationError,
};
use super::normalizer::{normalize, normalize_all};
use super::repository::{LeadStore, RawLeadRecord, StoreError};
use super::workflow::{StatusWorkflow, WorkflowDenied};
use crate::workflows::estimation::{EstimationEngine, EstimationError, InferenceGateway, PriceSource};

/// Facade composing the record store, normalizer, aggregator, status
/// workflow, and estimation engine behind the four exposed operations.
/// Every call takes an explicit owner; there is no ambient session.
pub struct LeadService<S, G> {
    store: Arc<S>,
    engine: Arc<EstimationEngine<G>>,
}

/// Filtered listing plus the summary counters, which always span the full
/// merged set regardless of the active filter. `failed_sources` labels a
/// degraded read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsView {
    pub leads: Vec<Lead>,
    pub counts: StatusCounts,
    pub failed_sources: Vec<Provenance>,
}

impl<S, G> LeadService<S, G>
where
    S: LeadStore + 'static,
    G: InferenceGateway + 'static,
{
    pub fn new(store: Arc<S>, engine: Arc<EstimationEngine<G>>) -> Self {
        Self { store, engine }
    }

    /// Merged, filtered listing over both sources. The reads run
    /// concurrently; one failed source degrades the view instead of
    /// emptying it, and only when both fail is the whole read an error.
    pub async fn get_merged_leads(
        &self,
        owner: &OwnerId,
        search_term: &str,
        status_filter: StatusFilter,
    ) -> Result<LeadsView, LeadServiceError> {
        let view = self.merged_view(owner).await?;
        let counts = count_by_status(&view.leads);
        let leads = filter(&view.leads, search_term, status_filter);

        Ok(LeadsView {
            leads,
            counts,
            failed_sources: view.failed_sources,
        })
    }

    /// Validates the submission, computes the price with the requested
    /// strategy, and persists a new owned lead carrying that price. The
    /// price is attached here once; nothing recomputes it later.
    pub async fn create_lead_with_estimate(
        &self,
        owner: &OwnerId,
        property: PropertyInput,
        contact: ContactInput,
        price_source: PriceSource,
    ) -> Result<Lead, LeadServiceError> {
        contact.validate()?;
        property.validate()?;

        let estimated_price = self.engine.estimate(&property, price_source).await?;

        let record = RawLeadRecord {
            id: String::new(),
            created_at: Utc::now().to_rfc3339(),
            name: contact.name.trim().to_string(),
            phone: contact.phone.trim().to_string(),
            email: contact.email.trim().to_string(),
            address: property.address(),
            area: property.land_size,
            price: estimated_price,
            status: Some(LeadStatus::New.label().to_string()),
            frontage: property.frontage,
            breadth: property.breadth,
            coverage_ratio: property.coverage_ratio,
            floor_area_ratio: property.floor_area_ratio,
        };

        let id = self.store.insert_owned(owner, record.clone()).await?;

        let stored = RawLeadRecord { id: id.0, ..record };
        normalize(&stored, Provenance::Owned).map_err(|_| {
            LeadServiceError::Store(StoreError::Unavailable(
                "insert returned an empty id".to_string(),
            ))
        })
    }

    /// Applies a status transition to an owned lead. Authorization is
    /// re-checked against the merged view before the store is touched, and
    /// the updated lead comes from the same view, not a re-merge.
    pub async fn set_lead_status(
        &self,
        owner: &OwnerId,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<Lead, LeadServiceError> {
        let mut view = self.merged_view(owner).await?;
        StatusWorkflow::resolve(&view, id, LeadOperation::UpdateStatus)?;

        self.store
            .update_owned_status(owner, id, status)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => LeadServiceError::NotFound { id: id.clone() },
                other => LeadServiceError::Store(other),
            })?;

        view.apply_status(id, status)
            .ok_or_else(|| LeadServiceError::NotFound { id: id.clone() })
    }

    /// Removes an owned lead. Broadcast leads are created and destroyed by
    /// the public feed alone, so the same authorization gate applies.
    pub async fn delete_lead(&self, owner: &OwnerId, id: &LeadId) -> Result<(), LeadServiceError> {
        let view = self.merged_view(owner).await?;
        StatusWorkflow::resolve(&view, id, LeadOperation::Delete)?;

        self.store
            .delete_owned(owner, id)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => LeadServiceError::NotFound { id: id.clone() },
                other => LeadServiceError::Store(other),
            })
    }

    async fn merged_view(&self, owner: &OwnerId) -> Result<MergedLeads, LeadServiceError> {
        let (owned_result, broadcast_result) =
            tokio::join!(self.store.list_owned(owner), self.store.list_broadcast());

        let mut failed_sources = Vec::new();

        let owned = match owned_result {
            Ok(records) => normalize_all(&records, Provenance::Owned),
            Err(error) => {
                warn!(%error, "owned store read failed");
                failed_sources.push(Provenance::Owned);
                Vec::new()
            }
        };

        let broadcast = match broadcast_result {
            Ok(records) => normalize_all(&records, Provenance::Broadcast),
            Err(error) => {
                warn!(%error, "broadcast feed read failed");
                failed_sources.push(Provenance::Broadcast);
                Vec::new()
            }
        };

        if failed_sources.len() == 2 {
            return Err(LeadServiceError::SourcesUnavailable {
                sources: failed_sources,
            });
        }

        Ok(MergedLeads::new(owned, broadcast, failed_sources))
    }
}

/// Error raised by the lead service. Authorization and not-found stay
/// separate variants so the boundary can render "forbidden" versus
/// "already gone".
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    #[error("lead '{}' originates from the broadcast feed and cannot be modified", id.0)]
    Unauthorized { id: LeadId },
    #[error("lead '{}' was not found in the owned store", id.0)]
    NotFound { id: LeadId },
    #[error("no lead source responded ({})", describe_sources(sources))]
    SourcesUnavailable { sources: Vec<Provenance> },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<WorkflowDenied> for LeadServiceError {
    fn from(denied: WorkflowDenied) -> Self {
        match denied {
            WorkflowDenied::Unauthorized { id } => Self::Unauthorized { id },
            WorkflowDenied::NotFound { id } => Self::NotFound { id },
        }
    }
}

fn describe_sources(sources: &[Provenance]) -> String {
    sources
        .iter()
        .map(|source| source.label())
        .collect::<Vec<_>>()
        .join(", ")
}
