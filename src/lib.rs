//! Property valuation pipeline: bulk CSV ingestion, record validation,
//! concurrent dispatch against a remote prediction service, and aggregation
//! of per-record outcomes into a batch report.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
