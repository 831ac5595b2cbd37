//! Batch Valuation Orchestrator
//!
//! Fans a collection of property records out to the prediction client
//! concurrently and joins on every outcome:
//! - One in-flight request per record, capped by a semaphore
//! - Per-record failures are data; they never cancel the rest of the batch
//! - Output order mirrors input order regardless of completion order

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::outcome::{BatchReport, PredictionOutcome};
use crate::domain::property::PropertyRecord;
use crate::infrastructure::predictor::PredictionClient;

pub struct BatchValuationUseCase {
    client: Arc<dyn PredictionClient + Send + Sync>,
    max_concurrency: usize,
}

impl BatchValuationUseCase {
    pub fn new(
        client: Arc<dyn PredictionClient + Send + Sync>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Dispatch one request per record and wait for the whole batch to
    /// settle.
    ///
    /// Returns a report with exactly one outcome per input record, in input
    /// order. The only aborting path is a failure inside the orchestration
    /// machinery itself (a panicked task); request failures surface as
    /// failure outcomes in the report.
    pub async fn execute(&self, records: Vec<PropertyRecord>) -> Result<BatchReport> {
        info!(
            records = records.len(),
            max_concurrency = self.max_concurrency,
            "Starting valuation batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let client = self.client.clone();
            let semaphore = semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(format!("Semaphore closed: {}", e)))?;

                debug!(index, "Dispatching valuation request");
                let outcome = match client.predict(&record).await {
                    Ok(price) => PredictionOutcome::Success { price, record },
                    Err(reason) => {
                        debug!(index, %reason, "Valuation request failed");
                        PredictionOutcome::Failure { reason, record }
                    }
                };
                Ok::<PredictionOutcome, AppError>(outcome)
            }));
        }

        // Awaiting handles in spawn order yields outcomes positionally
        // aligned with the input while requests complete in any order.
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = handle
                .await
                .map_err(|e| AppError::Internal(format!("Valuation task failed: {}", e)))??;
            outcomes.push(outcome);
        }

        let report = BatchReport::new(outcomes);
        info!(
            batch_id = %report.batch_id,
            succeeded = report.summary.succeeded,
            failed = report.summary.failed,
            "Valuation batch complete"
        );
        Ok(report)
    }
}
