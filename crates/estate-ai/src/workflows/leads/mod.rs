//! Lead aggregation core: normalization of the two record sources into one
//! canonical shape, the merged and filterable view, and the
//! provenance-gated status workflow.

pub mod address;
pub mod aggregator;
pub mod domain;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use address::{parse_address, ParsedAddress};
pub use aggregator::{
    authorize, count_by_status, filter, merge, MergedLeads, StatusCounts, StatusFilter,
};
pub use domain::{
    ContactInput, Lead, LeadId, LeadOperation, LeadStatus, OwnerId, PropertyInput, Provenance,
    ValidationError,
};
pub use normalizer::{normalize, normalize_all, NormalizeError};
pub use repository::{LeadStore, RawLeadRecord, StoreError};
pub use router::lead_router;
pub use service::{LeadService, LeadServiceError, LeadsView};
pub use workflow::{StatusWorkflow, WorkflowDenied};
