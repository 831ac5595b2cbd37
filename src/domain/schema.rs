// ============================================================
// FIELD SCHEMA
// ============================================================
// Static column-to-type mapping for the property record schema

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub const FIELD_BEDROOMS: &str = "bedrooms";
pub const FIELD_BATHROOMS: &str = "bathrooms";
pub const FIELD_SQFT_LIVING: &str = "sqft_living";
pub const FIELD_SQFT_LOT: &str = "sqft_lot";
pub const FIELD_FLOORS: &str = "floors";
pub const FIELD_SQFT_ABOVE: &str = "sqft_above";
pub const FIELD_SQFT_BASEMENT: &str = "sqft_basement";
pub const FIELD_YR_BUILT: &str = "yr_built";
pub const FIELD_ZIPCODE: &str = "zipcode";

/// Columns that must parse as non-NaN numbers before a bulk row becomes a
/// candidate record.
pub const REQUIRED_NUMERIC_FIELDS: [&str; 3] =
    [FIELD_BEDROOMS, FIELD_BATHROOMS, FIELD_SQFT_LIVING];

/// Columns whose cells are kept verbatim and never parsed as numbers.
pub static OPAQUE_TEXT_FIELDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from([FIELD_ZIPCODE]));

/// Semantic type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Text,
}

pub fn field_kind(name: &str) -> FieldKind {
    if OPAQUE_TEXT_FIELDS.contains(name) {
        FieldKind::Text
    } else {
        FieldKind::Numeric
    }
}

/// Zipcodes the manual-entry form accepts (King County service area).
pub const KNOWN_ZIPCODES: [&str; 45] = [
    "98001", "98002", "98003", "98004", "98005", "98007", "98011", "98022", "98023",
    "98024", "98027", "98028", "98029", "98030", "98031", "98032", "98034", "98038",
    "98042", "98045", "98052", "98056", "98058", "98059", "98065", "98072", "98074",
    "98075", "98092", "98106", "98107", "98112", "98115", "98116", "98117", "98118",
    "98119", "98122", "98125", "98126", "98166", "98178", "98188", "98198", "98199",
];

pub fn is_known_zipcode(zipcode: &str) -> bool {
    KNOWN_ZIPCODES.contains(&zipcode)
}
