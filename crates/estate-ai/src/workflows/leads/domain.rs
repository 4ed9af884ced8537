use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for leads. Ids are assigned by the record source; the
/// two sources never share an id space, so a [`LeadId`] only identifies a
/// lead together with its [`Provenance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Identifier wrapper for the owner of the private record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Workflow status tracked for every lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadStatus {
    New,
    InProgress,
    Completed,
}

impl LeadStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::New, Self::InProgress, Self::Completed]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        }
    }

    pub const fn label_ja(self) -> &'static str {
        match self {
            Self::New => "見積済",
            Self::InProgress => "対応中",
            Self::Completed => "完了",
        }
    }

    /// Maps a stored status value onto the enum. Older records carry the
    /// Japanese presentation labels; newer ones carry the wire tokens.
    /// Anything unrecognized (including a missing value) is treated as `New`.
    pub fn from_store_label(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("inProgress") | Some("in_progress") | Some("対応中") => Self::InProgress,
            Some("completed") | Some("完了") => Self::Completed,
            _ => Self::New,
        }
    }
}

/// Origin of a lead, which gates mutation rights: `Owned` leads come from
/// the caller's private store and are fully mutable by their owner;
/// `Broadcast` leads come from the shared public feed and are read-only
/// here. Also used to name a record source in degraded merge results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Owned,
    Broadcast,
}

impl Provenance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Broadcast => "broadcast",
        }
    }
}

/// Mutating operations subject to provenance authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadOperation {
    UpdateStatus,
    Delete,
}

/// Canonical in-memory lead, produced by the normalizer from either source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub region: String,
    pub locality: String,
    pub district: String,
    pub land_size: f64,
    pub estimated_price: u64,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub provenance: Provenance,
}

impl Lead {
    /// The searchable location string, matching how the address was joined
    /// before parsing.
    pub fn location(&self) -> String {
        format!("{} {} {}", self.region, self.locality, self.district)
    }
}

/// Property details submitted for an estimate. The last four fields feed the
/// remote inference model and default to zero when the submitter skips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub region: String,
    pub locality: String,
    #[serde(default)]
    pub district: String,
    pub land_size: f64,
    #[serde(default)]
    pub frontage: f64,
    #[serde(default)]
    pub breadth: f64,
    #[serde(default)]
    pub coverage_ratio: f64,
    #[serde(default)]
    pub floor_area_ratio: f64,
}

impl PropertyInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.region.trim().is_empty() {
            return Err(ValidationError::MissingField("region"));
        }
        if self.locality.trim().is_empty() {
            return Err(ValidationError::MissingField("locality"));
        }
        if !self.land_size.is_finite() || self.land_size <= 0.0 {
            return Err(ValidationError::NonPositiveLandSize(self.land_size));
        }
        Ok(())
    }

    /// The address string persisted to the store, reversible by the address
    /// parser as long as region and locality carry no inner whitespace.
    pub fn address(&self) -> String {
        if self.district.trim().is_empty() {
            format!("{} {}", self.region.trim(), self.locality.trim())
        } else {
            format!(
                "{} {} {}",
                self.region.trim(),
                self.locality.trim(),
                self.district.trim()
            )
        }
    }
}

/// Contact attributes submitted alongside a property. Email format is
/// checked once here, at creation time; it is not re-validated on merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingField("phone"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

fn is_valid_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Malformed required input on the creation path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field '{0}' is empty")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("land size must be a positive number, got {0}")]
    NonPositiveLandSize(f64),
}
