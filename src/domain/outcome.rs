// ============================================================
// PREDICTION OUTCOMES
// ============================================================
// Per-record outcome of a valuation attempt and the aggregated
// batch report handed to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::property::PropertyRecord;

/// Why a single valuation request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionFailure {
    /// The request never completed (connect, timeout, DNS, ...).
    Transport(String),
    /// The service answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The service answered 2xx but the body carried no numeric price.
    InvalidResponse(String),
}

impl fmt::Display for PredictionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionFailure::Transport(msg) => write!(f, "Request failed: {}", msg),
            PredictionFailure::Status { status, body } => {
                write!(f, "API error ({}): {}", status, body)
            }
            PredictionFailure::InvalidResponse(msg) => {
                write!(f, "Invalid response: {}", msg)
            }
        }
    }
}

/// The per-record result of one valuation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredictionOutcome {
    Success {
        price: f64,
        record: PropertyRecord,
    },
    Failure {
        reason: PredictionFailure,
        record: PropertyRecord,
    },
}

impl PredictionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Success { .. })
    }

    pub fn price(&self) -> Option<f64> {
        match self {
            PredictionOutcome::Success { price, .. } => Some(*price),
            PredictionOutcome::Failure { .. } => None,
        }
    }

    pub fn record(&self) -> &PropertyRecord {
        match self {
            PredictionOutcome::Success { record, .. } => record,
            PredictionOutcome::Failure { record, .. } => record,
        }
    }

    pub fn failure_reason(&self) -> Option<&PredictionFailure> {
        match self {
            PredictionOutcome::Failure { reason, .. } => Some(reason),
            PredictionOutcome::Success { .. } => None,
        }
    }
}

/// Overall status of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    FullSuccess,
    PartialSuccess,
    TotalFailure,
    Empty,
}

impl BatchStatus {
    pub fn from_outcomes(outcomes: &[PredictionOutcome]) -> Self {
        if outcomes.is_empty() {
            return BatchStatus::Empty;
        }
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        if succeeded == outcomes.len() {
            BatchStatus::FullSuccess
        } else if succeeded > 0 {
            BatchStatus::PartialSuccess
        } else {
            BatchStatus::TotalFailure
        }
    }
}

/// Aggregate statistics over a batch's successful outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total_value: f64,
    pub average_value: f64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[PredictionOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = outcomes.len() - succeeded;
        let total_value: f64 = outcomes.iter().filter_map(PredictionOutcome::price).sum();
        let average_value = if succeeded > 0 {
            total_value / succeeded as f64
        } else {
            0.0
        };

        Self {
            succeeded,
            failed,
            total_value,
            average_value,
        }
    }
}

/// The reportable result of one batch submission.
///
/// Constructed once per batch and immutable afterwards. Outcomes are in
/// input order, and failures are retained alongside successes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub outcomes: Vec<PredictionOutcome>,
    pub summary: BatchSummary,
    pub status: BatchStatus,
    pub completed_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<PredictionOutcome>) -> Self {
        let summary = BatchSummary::from_outcomes(&outcomes);
        let status = BatchStatus::from_outcomes(&outcomes);

        Self {
            batch_id: Uuid::new_v4().to_string(),
            outcomes,
            summary,
            status,
            completed_at: Utc::now(),
        }
    }
}
