use super::aggregator::{authorize, MergedLeads};
use super::domain::{Lead, LeadId, LeadOperation, Provenance};

/// Outcome of a rejected mutation. The two cases stay distinct so callers
/// can render "forbidden" versus "already gone".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowDenied {
    #[error("lead '{}' originates from the broadcast feed and cannot be modified", id.0)]
    Unauthorized { id: LeadId },
    #[error("lead '{}' was not found in the owned store", id.0)]
    NotFound { id: LeadId },
}

/// Gate in front of every status transition and delete.
///
/// The workflow places no ordering constraint on transitions: any status,
/// including the current one, may be applied. That models the operator's
/// manual override, not a strict pipeline. What it does enforce is mutation
/// authority: every operation re-checks [`authorize`] against the resolved
/// lead before anything is persisted, and a rejection leaves all state
/// unchanged.
pub struct StatusWorkflow;

impl StatusWorkflow {
    /// Resolves the target lead in the merged view and authorizes the
    /// operation against it. An owned lead wins when both sources carry the
    /// same id; a lead found only in the broadcast feed is reported as
    /// unauthorized rather than absent.
    pub fn resolve<'a>(
        view: &'a MergedLeads,
        id: &LeadId,
        operation: LeadOperation,
    ) -> Result<&'a Lead, WorkflowDenied> {
        let lead = view
            .find(Provenance::Owned, id)
            .or_else(|| view.find(Provenance::Broadcast, id))
            .ok_or_else(|| WorkflowDenied::NotFound { id: id.clone() })?;

        if !authorize(lead, operation) {
            return Err(WorkflowDenied::Unauthorized { id: id.clone() });
        }

        Ok(lead)
    }
}
