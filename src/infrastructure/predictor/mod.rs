mod http;

pub use http::{HttpPredictionClient, PredictionTask};

use async_trait::async_trait;

use crate::domain::error::Result;
use crate::domain::outcome::PredictionFailure;
use crate::domain::property::PropertyRecord;

/// One round trip against the remote valuation service.
///
/// `predict` returns per-record failures as values so a batch can keep
/// going; only `status` reports errors through the crate error type.
#[async_trait]
pub trait PredictionClient {
    async fn predict(
        &self,
        record: &PropertyRecord,
    ) -> std::result::Result<f64, PredictionFailure>;

    /// Probe the service health endpoint and return its reported status.
    async fn status(&self) -> Result<String>;
}
