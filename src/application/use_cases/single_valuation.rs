use std::sync::Arc;
use tracing::info;

use crate::domain::error::Result;
use crate::domain::outcome::PredictionOutcome;
use crate::infrastructure::predictor::PredictionClient;

use super::manual_entry::PropertyForm;

/// Value one manually entered property.
pub struct SingleValuationUseCase {
    client: Arc<dyn PredictionClient + Send + Sync>,
}

impl SingleValuationUseCase {
    pub fn new(client: Arc<dyn PredictionClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Validate the form and run one valuation.
    ///
    /// A form that fails validation is rejected before any request is sent;
    /// a request failure is returned as a failure outcome, not an error.
    pub async fn execute(&self, form: &PropertyForm) -> Result<PredictionOutcome> {
        let record = form.to_record()?;

        info!(zipcode = %record.zipcode, "Valuing single property");
        let outcome = match self.client.predict(&record).await {
            Ok(price) => PredictionOutcome::Success { price, record },
            Err(reason) => PredictionOutcome::Failure { reason, record },
        };

        Ok(outcome)
    }
}
