use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::PredictionClient;
use crate::domain::error::{AppError, Result};
use crate::domain::outcome::PredictionFailure;
use crate::domain::property::PropertyRecord;
use crate::infrastructure::config::ServiceSettings;

/// The documented request payload for one valuation.
///
/// Defaults for optional fields are applied here and nowhere upstream:
/// lot size 0, floor count 1, above-ground area falls back to the living
/// area, basement area 0. Year built is collected but not part of the
/// service contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionTask {
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub floors: f64,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    pub zipcode: String,
}

impl PredictionTask {
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            sqft_living: record.sqft_living,
            sqft_lot: record.sqft_lot.unwrap_or(0.0),
            floors: record.floors.unwrap_or(1.0),
            sqft_above: record.sqft_above.unwrap_or(record.sqft_living),
            sqft_basement: record.sqft_basement.unwrap_or(0.0),
            zipcode: record.zipcode.clone(),
        }
    }

    /// Re-derive the canonical record this payload describes.
    pub fn to_record(&self) -> PropertyRecord {
        PropertyRecord {
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            sqft_living: self.sqft_living,
            sqft_lot: Some(self.sqft_lot),
            floors: Some(self.floors),
            sqft_above: Some(self.sqft_above),
            sqft_basement: Some(self.sqft_basement),
            yr_built: None,
            zipcode: self.zipcode.clone(),
        }
    }
}

/// HTTP client for the prediction service.
pub struct HttpPredictionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(
        &self,
        record: &PropertyRecord,
    ) -> std::result::Result<f64, PredictionFailure> {
        let task = PredictionTask::from_record(record);
        let url = format!("{}/predict", self.base_url);

        debug!(%url, zipcode = %task.zipcode, "Sending valuation request");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "task": task }))
            .send()
            .await
            .map_err(|e| PredictionFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionFailure::Status { status, body });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            PredictionFailure::InvalidResponse(format!("Failed to parse JSON: {}", e))
        })?;

        body.get("price").and_then(|p| p.as_f64()).ok_or_else(|| {
            PredictionFailure::InvalidResponse(
                "Response is missing a numeric price field".to_string(),
            )
        })
    }

    async fn status(&self) -> Result<String> {
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::PredictionError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::PredictionError(format!(
                "API error ({})",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::PredictionError(format!("Failed to parse JSON: {}", e)))?;

        Ok(body
            .get("Status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown")
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record() -> PropertyRecord {
        PropertyRecord {
            bedrooms: 3.0,
            bathrooms: 2.0,
            sqft_living: 1800.0,
            sqft_lot: None,
            floors: None,
            sqft_above: None,
            sqft_basement: None,
            yr_built: Some(1975.0),
            zipcode: "98117".to_string(),
        }
    }

    fn settings(base_url: String) -> ServiceSettings {
        ServiceSettings {
            base_url,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_task_defaults_apply_only_when_absent() {
        let task = PredictionTask::from_record(&record());
        assert_eq!(task.sqft_lot, 0.0);
        assert_eq!(task.floors, 1.0);
        assert_eq!(task.sqft_above, 1800.0);
        assert_eq!(task.sqft_basement, 0.0);

        let explicit = PropertyRecord {
            sqft_lot: Some(0.0),
            floors: Some(3.0),
            sqft_above: Some(1200.0),
            ..record()
        };
        let task = PredictionTask::from_record(&explicit);
        assert_eq!(task.floors, 3.0);
        assert_eq!(task.sqft_above, 1200.0);
    }

    #[test]
    fn test_task_roundtrips_to_record() {
        let task = PredictionTask::from_record(&record());
        let rebuilt = task.to_record();

        assert_eq!(rebuilt.bedrooms, 3.0);
        assert_eq!(rebuilt.bathrooms, 2.0);
        assert_eq!(rebuilt.sqft_living, 1800.0);
        assert_eq!(rebuilt.sqft_lot, Some(0.0));
        assert_eq!(rebuilt.floors, Some(1.0));
        assert_eq!(rebuilt.sqft_above, Some(1800.0));
        assert_eq!(rebuilt.sqft_basement, Some(0.0));
        assert_eq!(rebuilt.zipcode, "98117");
        assert_eq!(PredictionTask::from_record(&rebuilt), task);
    }

    #[tokio::test]
    async fn test_predict_returns_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({
                "task": {
                    "bedrooms": 3.0,
                    "bathrooms": 2.0,
                    "sqft_living": 1800.0,
                    "sqft_lot": 0.0,
                    "floors": 1.0,
                    "sqft_above": 1800.0,
                    "sqft_basement": 0.0,
                    "zipcode": "98117"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "price": 432000.5 })))
            .mount(&server)
            .await;

        let client = HttpPredictionClient::new(&settings(server.uri())).unwrap();
        let price = client.predict(&record()).await.unwrap();
        assert_eq!(price, 432000.5);
    }

    #[tokio::test]
    async fn test_predict_classifies_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "model exploded" })),
            )
            .mount(&server)
            .await;

        let client = HttpPredictionClient::new(&settings(server.uri())).unwrap();
        match client.predict(&record()).await {
            Err(PredictionFailure::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("model exploded"));
            }
            other => panic!("expected status failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_predict_classifies_missing_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "price": "high" })))
            .mount(&server)
            .await;

        let client = HttpPredictionClient::new(&settings(server.uri())).unwrap();
        assert!(matches!(
            client.predict(&record()).await,
            Err(PredictionFailure::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_predict_classifies_transport_error() {
        // Nothing listens on this port.
        let client =
            HttpPredictionClient::new(&settings("http://127.0.0.1:9".to_string())).unwrap();
        assert!(matches!(
            client.predict(&record()).await,
            Err(PredictionFailure::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_status_reports_running() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": "Running" })))
            .mount(&server)
            .await;

        let client = HttpPredictionClient::new(&settings(server.uri())).unwrap();
        assert_eq!(client.status().await.unwrap(), "Running");
    }
}
