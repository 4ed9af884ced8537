use chrono::{DateTime, Utc};
use tracing::warn;

use super::address::parse_address;
use super::domain::{Lead, LeadId, LeadStatus, Provenance};
use super::repository::RawLeadRecord;

/// The only normalization failure: a record without an identifier cannot be
/// tracked. Every other gap is absorbed by the leniency rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("record is missing its identifier")]
    MissingId,
}

/// Converts a raw store record into the canonical lead shape, stamping the
/// given provenance. The input is borrowed and never mutated.
///
/// Leniency is deliberate because upstream rows are partially populated:
/// missing numerics already arrive as `0` from the wire layer, a missing or
/// unrecognized status becomes `New`, and an unparsable `created_at` is
/// pinned to the Unix epoch so malformed rows sort last in the default
/// newest-first ordering.
pub fn normalize(record: &RawLeadRecord, provenance: Provenance) -> Result<Lead, NormalizeError> {
    if record.id.trim().is_empty() {
        return Err(NormalizeError::MissingId);
    }

    let parsed = parse_address(&record.address);

    Ok(Lead {
        id: LeadId(record.id.clone()),
        name: record.name.clone(),
        phone: record.phone.clone(),
        email: record.email.clone(),
        region: parsed.region,
        locality: parsed.locality,
        district: parsed.district,
        land_size: record.area,
        estimated_price: record.price,
        status: LeadStatus::from_store_label(record.status.as_deref()),
        created_at: parse_created_at(&record.created_at),
        provenance,
    })
}

/// Normalizes a full listing. Records rejected for a missing identifier are
/// skipped with a warning rather than failing the whole read; a listing is
/// a view, not a validation gate.
pub fn normalize_all(records: &[RawLeadRecord], provenance: Provenance) -> Vec<Lead> {
    records
        .iter()
        .filter_map(|record| match normalize(record, provenance) {
            Ok(lead) => Some(lead),
            Err(error) => {
                warn!(source = provenance.label(), %error, "skipping unidentifiable record");
                None
            }
        })
        .collect()
}

fn parse_created_at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
