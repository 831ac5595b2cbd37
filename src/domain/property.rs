// ============================================================
// PROPERTY RECORD TYPES
// ============================================================
// Candidate records parsed from bulk input and the canonical
// property record submitted for valuation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::schema;

/// A cell value after per-field type coercion.
///
/// Numeric cells that fail to parse are carried as NaN so the required-field
/// gate can reject the row; an empty numeric cell is coerced to zero.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

/// A row parsed from bulk input, not yet confirmed valid.
///
/// Carries every column the source provided, including ones the request
/// payload will ignore.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// 1-based data-row ordinal within the parsed text (blank lines excluded).
    pub row: usize,
    pub fields: HashMap<String, FieldValue>,
}

impl CandidateRecord {
    pub fn new(row: usize, fields: HashMap<String, FieldValue>) -> Self {
        Self { row, fields }
    }

    /// Numeric value of a field, filtering out NaN placeholders.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields
            .get(name)
            .and_then(FieldValue::as_number)
            .filter(|n| !n.is_nan())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }
}

/// The canonical property record, ready for submission.
///
/// The three minimally required numeric fields are always present; the rest
/// are optional and default-filled by the prediction client when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: Option<f64>,
    pub floors: Option<f64>,
    pub sqft_above: Option<f64>,
    pub sqft_basement: Option<f64>,
    pub yr_built: Option<f64>,
    pub zipcode: String,
}

impl PropertyRecord {
    /// Promote a candidate to a canonical record.
    ///
    /// Returns `None` when any required numeric field is missing or NaN.
    /// Optional numeric fields that did not parse cleanly are treated as
    /// absent rather than carried as NaN.
    pub fn from_candidate(candidate: &CandidateRecord) -> Option<Self> {
        let bedrooms = candidate.number(schema::FIELD_BEDROOMS)?;
        let bathrooms = candidate.number(schema::FIELD_BATHROOMS)?;
        let sqft_living = candidate.number(schema::FIELD_SQFT_LIVING)?;

        Some(Self {
            bedrooms,
            bathrooms,
            sqft_living,
            sqft_lot: candidate.number(schema::FIELD_SQFT_LOT),
            floors: candidate.number(schema::FIELD_FLOORS),
            sqft_above: candidate.number(schema::FIELD_SQFT_ABOVE),
            sqft_basement: candidate.number(schema::FIELD_SQFT_BASEMENT),
            yr_built: candidate.number(schema::FIELD_YR_BUILT),
            zipcode: candidate
                .text(schema::FIELD_ZIPCODE)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(pairs: &[(&str, FieldValue)]) -> CandidateRecord {
        CandidateRecord::new(
            1,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_from_candidate_requires_minimal_fields() {
        let full = candidate(&[
            ("bedrooms", FieldValue::Number(3.0)),
            ("bathrooms", FieldValue::Number(2.0)),
            ("sqft_living", FieldValue::Number(1800.0)),
            ("zipcode", FieldValue::Text("98117".to_string())),
        ]);
        let record = PropertyRecord::from_candidate(&full).unwrap();
        assert_eq!(record.bedrooms, 3.0);
        assert_eq!(record.zipcode, "98117");
        assert_eq!(record.sqft_lot, None);

        let missing = candidate(&[
            ("bedrooms", FieldValue::Number(3.0)),
            ("sqft_living", FieldValue::Number(1800.0)),
        ]);
        assert!(PropertyRecord::from_candidate(&missing).is_none());

        let nan = candidate(&[
            ("bedrooms", FieldValue::Number(f64::NAN)),
            ("bathrooms", FieldValue::Number(2.0)),
            ("sqft_living", FieldValue::Number(1800.0)),
        ]);
        assert!(PropertyRecord::from_candidate(&nan).is_none());
    }

    #[test]
    fn test_unparseable_optional_field_becomes_absent() {
        let record = PropertyRecord::from_candidate(&candidate(&[
            ("bedrooms", FieldValue::Number(3.0)),
            ("bathrooms", FieldValue::Number(2.0)),
            ("sqft_living", FieldValue::Number(1800.0)),
            ("sqft_lot", FieldValue::Number(f64::NAN)),
        ]))
        .unwrap();
        assert_eq!(record.sqft_lot, None);
    }

    #[test]
    fn test_missing_zipcode_defaults_to_empty() {
        let record = PropertyRecord::from_candidate(&candidate(&[
            ("bedrooms", FieldValue::Number(3.0)),
            ("bathrooms", FieldValue::Number(2.0)),
            ("sqft_living", FieldValue::Number(1800.0)),
        ]))
        .unwrap();
        assert_eq!(record.zipcode, "");
    }
}
