//! Lead aggregation and price estimation engine for the valuation service.
//!
//! Leads arrive from two record sources with different ownership rules: the
//! caller's private store and a shared read-only broadcast feed. This crate
//! normalizes both into one canonical [`workflows::leads::Lead`] shape,
//! merges them into a filterable view, gates every mutation on provenance,
//! and produces price estimates either from a per-region formula or from the
//! remote inference endpoint.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
