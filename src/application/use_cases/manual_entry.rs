use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::property::PropertyRecord;
use crate::domain::schema;

/// Form field identifiers for the manual-entry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormField {
    Bedrooms,
    Bathrooms,
    SqftLiving,
    SqftLot,
    Floors,
    SqftAbove,
    SqftBasement,
    YrBuilt,
    Zipcode,
}

/// Manual-entry form state.
///
/// Fields hold raw text while the user types; lot size and floor count are
/// optional, everything else must be filled in before a record can be built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PropertyForm {
    #[validate(length(min = 1))]
    pub bedrooms: String,
    #[validate(length(min = 1))]
    pub bathrooms: String,
    #[validate(length(min = 1))]
    pub sqft_living: String,
    pub sqft_lot: String,
    pub floors: String,
    #[validate(length(min = 1))]
    pub sqft_above: String,
    #[validate(length(min = 1))]
    pub sqft_basement: String,
    #[validate(length(min = 1))]
    pub yr_built: String,
    #[validate(length(min = 1))]
    pub zipcode: String,
}

impl PropertyForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a field edit.
    ///
    /// Input that parses as a negative number is rejected at entry time and
    /// the prior value retained; anything else, including non-numeric text,
    /// is stored as typed. Returns whether the edit was accepted.
    pub fn set(&mut self, field: FormField, value: &str) -> bool {
        let value = value.trim();
        if value.parse::<f64>().map(|n| n < 0.0).unwrap_or(false) {
            debug!(?field, value, "Rejecting negative field update");
            return false;
        }
        *self.slot_mut(field) = value.to_string();
        true
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Bedrooms => &self.bedrooms,
            FormField::Bathrooms => &self.bathrooms,
            FormField::SqftLiving => &self.sqft_living,
            FormField::SqftLot => &self.sqft_lot,
            FormField::Floors => &self.floors,
            FormField::SqftAbove => &self.sqft_above,
            FormField::SqftBasement => &self.sqft_basement,
            FormField::YrBuilt => &self.yr_built,
            FormField::Zipcode => &self.zipcode,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Bedrooms => &mut self.bedrooms,
            FormField::Bathrooms => &mut self.bathrooms,
            FormField::SqftLiving => &mut self.sqft_living,
            FormField::SqftLot => &mut self.sqft_lot,
            FormField::Floors => &mut self.floors,
            FormField::SqftAbove => &mut self.sqft_above,
            FormField::SqftBasement => &mut self.sqft_basement,
            FormField::YrBuilt => &mut self.yr_built,
            FormField::Zipcode => &mut self.zipcode,
        }
    }

    /// Whether the form can be submitted. Recomputed from current field
    /// state on every call.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok() && schema::is_known_zipcode(&self.zipcode)
    }

    /// Build the canonical record, or explain why the form is unusable.
    pub fn to_record(&self) -> Result<PropertyRecord> {
        self.validate().map_err(|e| {
            AppError::ValidationError(format!("Form is incomplete: {}", e))
        })?;

        if !schema::is_known_zipcode(&self.zipcode) {
            return Err(AppError::ValidationError(format!(
                "Unknown zipcode '{}'",
                self.zipcode
            )));
        }

        Ok(PropertyRecord {
            bedrooms: parse_required(&self.bedrooms, schema::FIELD_BEDROOMS)?,
            bathrooms: parse_required(&self.bathrooms, schema::FIELD_BATHROOMS)?,
            sqft_living: parse_required(&self.sqft_living, schema::FIELD_SQFT_LIVING)?,
            sqft_lot: parse_optional(&self.sqft_lot, schema::FIELD_SQFT_LOT)?,
            floors: parse_optional(&self.floors, schema::FIELD_FLOORS)?,
            sqft_above: Some(parse_required(&self.sqft_above, schema::FIELD_SQFT_ABOVE)?),
            sqft_basement: Some(parse_required(
                &self.sqft_basement,
                schema::FIELD_SQFT_BASEMENT,
            )?),
            yr_built: Some(parse_required(&self.yr_built, schema::FIELD_YR_BUILT)?),
            zipcode: self.zipcode.clone(),
        })
    }
}

fn parse_required(value: &str, field: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| {
        AppError::ValidationError(format!("Field '{}' is not a number: '{}'", field, value))
    })
}

fn parse_optional(value: &str, field: &str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_required(value, field).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> PropertyForm {
        let mut form = PropertyForm::new();
        form.set(FormField::Bedrooms, "3");
        form.set(FormField::Bathrooms, "2");
        form.set(FormField::SqftLiving, "1800");
        form.set(FormField::SqftAbove, "1400");
        form.set(FormField::SqftBasement, "400");
        form.set(FormField::YrBuilt, "1975");
        form.set(FormField::Zipcode, "98117");
        form
    }

    #[test]
    fn test_negative_update_retains_prior_value() {
        let mut form = PropertyForm::new();
        assert!(form.set(FormField::Bedrooms, "3"));
        assert!(!form.set(FormField::Bedrooms, "-1"));
        assert_eq!(form.get(FormField::Bedrooms), "3");
    }

    #[test]
    fn test_non_numeric_text_is_stored() {
        let mut form = PropertyForm::new();
        assert!(form.set(FormField::Bedrooms, "abc"));
        assert_eq!(form.get(FormField::Bedrooms), "abc");
    }

    #[test]
    fn test_validity_is_recomputed_per_query() {
        let mut form = filled_form();
        assert!(form.is_valid());

        form.set(FormField::YrBuilt, "");
        assert!(!form.is_valid());

        form.set(FormField::YrBuilt, "1975");
        assert!(form.is_valid());
    }

    #[test]
    fn test_optional_fields_not_required() {
        let form = filled_form();
        assert_eq!(form.get(FormField::SqftLot), "");
        assert_eq!(form.get(FormField::Floors), "");
        assert!(form.is_valid());
    }

    #[test]
    fn test_unknown_zipcode_blocks_submission() {
        let mut form = filled_form();
        form.set(FormField::Zipcode, "10001");
        assert!(!form.is_valid());
        assert!(form.to_record().is_err());
    }

    #[test]
    fn test_to_record_builds_canonical_values() {
        let record = filled_form().to_record().unwrap();

        assert_eq!(record.bedrooms, 3.0);
        assert_eq!(record.bathrooms, 2.0);
        assert_eq!(record.sqft_living, 1800.0);
        assert_eq!(record.sqft_lot, None);
        assert_eq!(record.floors, None);
        assert_eq!(record.sqft_above, Some(1400.0));
        assert_eq!(record.sqft_basement, Some(400.0));
        assert_eq!(record.yr_built, Some(1975.0));
        assert_eq!(record.zipcode, "98117");
    }

    #[test]
    fn test_to_record_rejects_incomplete_form() {
        let mut form = filled_form();
        form.set(FormField::SqftLiving, "");
        assert!(form.to_record().is_err());
    }

    #[test]
    fn test_to_record_rejects_non_numeric_field() {
        let mut form = filled_form();
        form.set(FormField::Bathrooms, "two");
        assert!(form.to_record().is_err());
    }
}
