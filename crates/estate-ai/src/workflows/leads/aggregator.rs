use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadId, LeadOperation, LeadStatus, Provenance};

/// Status predicate applied by [`filter`]. `All` disables status matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    New,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, status: LeadStatus) -> bool {
        match self {
            Self::All => true,
            Self::New => status == LeadStatus::New,
            Self::InProgress => status == LeadStatus::InProgress,
            Self::Completed => status == LeadStatus::Completed,
        }
    }
}

/// Per-status totals over the merged set, broadcast leads included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub new: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: LeadStatus) -> usize {
        match status {
            LeadStatus::New => self.new,
            LeadStatus::InProgress => self.in_progress,
            LeadStatus::Completed => self.completed,
        }
    }
}

/// Merges the two sources into one ordered sequence: broadcast leads first,
/// then owned, then a stable sort by `created_at` descending. The stable
/// sort means equal timestamps keep the source order, so ties break
/// deterministically.
pub fn merge(owned: Vec<Lead>, broadcast: Vec<Lead>) -> Vec<Lead> {
    let mut leads = broadcast;
    leads.extend(owned);
    leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    leads
}

/// Applies the search term and status filter, ANDed. The search matches
/// case-insensitively against the name or the joined
/// "region locality district" location string.
pub fn filter(leads: &[Lead], search_term: &str, status: StatusFilter) -> Vec<Lead> {
    let needle = search_term.trim().to_lowercase();

    leads
        .iter()
        .filter(|lead| {
            let matches_search = needle.is_empty()
                || lead.name.to_lowercase().contains(&needle)
                || lead.location().to_lowercase().contains(&needle);
            matches_search && status.matches(lead.status)
        })
        .cloned()
        .collect()
}

pub fn count_by_status(leads: &[Lead]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for lead in leads {
        match lead.status {
            LeadStatus::New => counts.new += 1,
            LeadStatus::InProgress => counts.in_progress += 1,
            LeadStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Mutation authority: status updates and deletion exist only for leads the
/// caller owns. Broadcast leads are read-only here regardless of operation,
/// and every mutating entry point checks this before touching the store.
pub fn authorize(lead: &Lead, operation: LeadOperation) -> bool {
    match operation {
        LeadOperation::UpdateStatus | LeadOperation::Delete => {
            lead.provenance == Provenance::Owned
        }
    }
}

/// The merged view handed back to callers. A failed source never silently
/// empties the view: whatever was read is kept and the failure is labeled
/// in `failed_sources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedLeads {
    pub leads: Vec<Lead>,
    pub failed_sources: Vec<Provenance>,
}

impl MergedLeads {
    pub fn new(owned: Vec<Lead>, broadcast: Vec<Lead>, failed_sources: Vec<Provenance>) -> Self {
        Self {
            leads: merge(owned, broadcast),
            failed_sources,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.failed_sources.is_empty()
    }

    /// Provenance and id jointly identify a lead; an id alone is ambiguous
    /// across the two sources.
    pub fn find(&self, provenance: Provenance, id: &LeadId) -> Option<&Lead> {
        self.leads
            .iter()
            .find(|lead| lead.provenance == provenance && &lead.id == id)
    }

    /// Updates the owned lead's status in place, so the view reflects a
    /// persisted transition without a full re-merge. Returns the updated
    /// lead, or `None` when no owned lead carries the id.
    pub fn apply_status(&mut self, id: &LeadId, status: LeadStatus) -> Option<Lead> {
        let lead = self
            .leads
            .iter_mut()
            .find(|lead| lead.provenance == Provenance::Owned && &lead.id == id)?;
        lead.status = status;
        Some(lead.clone())
    }

    /// Drops the owned lead from the view after a persisted delete. Returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: &LeadId) -> bool {
        let before = self.leads.len();
        self.leads
            .retain(|lead| !(lead.provenance == Provenance::Owned && &lead.id == id));
        self.leads.len() != before
    }
}
