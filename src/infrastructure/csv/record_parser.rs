// ============================================================
// RECORD PARSER
// ============================================================
// Parse raw delimited text into candidate property records,
// tolerating malformed rows

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::domain::error::Result;
use crate::domain::property::{CandidateRecord, FieldValue};
use crate::domain::schema::{self, FieldKind};

/// Why a data row was dropped instead of becoming a candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    ColumnCountMismatch { expected: usize, found: usize },
    MissingRequiredField { field: String },
    NonNumericRequiredField { field: String },
    Unreadable(String),
}

/// A dropped row, identified by its 1-based data-row ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    pub row: usize,
    pub reason: DropReason,
}

/// Result of parsing one bulk upload.
///
/// Malformed rows never abort parsing; they are reported here so callers
/// can surface how many rows were ignored and why.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBatch {
    pub records: Vec<CandidateRecord>,
    pub dropped: Vec<DroppedRow>,
}

impl ParsedBatch {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Parser for delimited property uploads.
pub struct RecordParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse a delimited file, decoding the raw bytes first.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedBatch> {
        let bytes = std::fs::read(path)?;
        let content = decode_text(&bytes);
        self.parse_content(&content)
    }

    /// Parse delimited text into candidate records.
    ///
    /// The first non-blank line is the header; header cells are trimmed and
    /// used verbatim as field names. Blank lines are skipped and do not
    /// count toward row ordinals.
    pub fn parse_content(&self, content: &str) -> Result<ParsedBatch> {
        // Blank lines never count, not even as the header line.
        let content: String = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = match reader.headers() {
            Ok(headers) => headers.iter().map(|h| h.to_string()).collect(),
            // No header line at all: nothing to parse.
            Err(_) => {
                return Ok(ParsedBatch {
                    records: Vec::new(),
                    dropped: Vec::new(),
                })
            }
        };

        let mut records = Vec::new();
        let mut dropped = Vec::new();
        let mut row = 0usize;

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    row += 1;
                    debug!(row, error = %e, "Dropping unreadable row");
                    dropped.push(DroppedRow {
                        row,
                        reason: DropReason::Unreadable(e.to_string()),
                    });
                    continue;
                }
            };

            if is_blank(&record) {
                continue;
            }
            row += 1;

            if record.len() != headers.len() {
                debug!(
                    row,
                    expected = headers.len(),
                    found = record.len(),
                    "Dropping row with mismatched column count"
                );
                dropped.push(DroppedRow {
                    row,
                    reason: DropReason::ColumnCountMismatch {
                        expected: headers.len(),
                        found: record.len(),
                    },
                });
                continue;
            }

            let fields = coerce_fields(&headers, &record);
            match check_required(&fields) {
                Ok(()) => records.push(CandidateRecord::new(row, fields)),
                Err(reason) => {
                    debug!(row, ?reason, "Dropping row with unusable required field");
                    dropped.push(DroppedRow { row, reason });
                }
            }
        }

        debug!(
            records = records.len(),
            dropped = dropped.len(),
            "Parsed bulk upload"
        );
        Ok(ParsedBatch { records, dropped })
    }
}

/// Coerce each cell per the field schema: opaque-string fields are kept
/// verbatim, everything else is parsed as a float with the empty string
/// coerced to zero and parse failures carried as NaN.
fn coerce_fields(headers: &[String], record: &StringRecord) -> HashMap<String, FieldValue> {
    headers
        .iter()
        .zip(record.iter())
        .map(|(header, cell)| {
            let value = match schema::field_kind(header) {
                FieldKind::Text => FieldValue::Text(cell.to_string()),
                FieldKind::Numeric if cell.is_empty() => FieldValue::Number(0.0),
                FieldKind::Numeric => {
                    FieldValue::Number(cell.parse::<f64>().unwrap_or(f64::NAN))
                }
            };
            (header.clone(), value)
        })
        .collect()
}

fn check_required(fields: &HashMap<String, FieldValue>) -> std::result::Result<(), DropReason> {
    for field in schema::REQUIRED_NUMERIC_FIELDS {
        match fields.get(field) {
            None => {
                return Err(DropReason::MissingRequiredField {
                    field: field.to_string(),
                })
            }
            Some(FieldValue::Number(n)) if n.is_nan() => {
                return Err(DropReason::NonNumericRequiredField {
                    field: field.to_string(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).unwrap_or("").is_empty()
}

/// Decode raw upload bytes, preferring UTF-8 and falling back to a legacy
/// single-byte encoding when the input is not valid UTF-8.
fn decode_text(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}
