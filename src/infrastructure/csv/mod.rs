// ============================================================
// CSV INFRASTRUCTURE
// ============================================================
// Bulk ingestion of delimited property records

mod record_parser;

pub use record_parser::{DropReason, DroppedRow, ParsedBatch, RecordParser};
