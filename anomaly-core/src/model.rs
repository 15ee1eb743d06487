use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AdapterError;

/// Endpoint of the One Call API used when the request does not name one.
pub const DEFAULT_ENDPOINT: &str = "timemachine";

/// Correlation id used when the caller does not supply one.
pub const DEFAULT_JOB_ID: &str = "1";

/// Caller-supplied correlation token. Any JSON value is accepted and echoed back untouched.
pub type JobId = Value;

/// Request parameters after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub id: JobId,
    pub latitude: f64,
    pub longitude: f64,
    pub endpoint: String,
}

/// One historical day to fetch for a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct DayQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Unix timestamp, in seconds, inside the requested day.
    pub dt: i64,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviationResult {
    pub id: JobId,
    pub answer: bool,
}

impl DeviationResult {
    /// `{ "id": ..., "data": { "answer": ... } }`
    pub fn to_body(&self) -> Value {
        json!({
            "id": self.id,
            "data": { "answer": self.answer },
        })
    }
}

/// Plain status + JSON body produced by the core, translated by each platform adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreResponse {
    pub status: u16,
    pub body: Value,
}

impl CoreResponse {
    pub fn success(result: &DeviationResult) -> Self {
        Self {
            status: 200,
            body: result.to_body(),
        }
    }

    pub fn failure(id: JobId, error: &AdapterError) -> Self {
        let status = error.status_code();
        Self {
            status,
            body: json!({
                "id": id,
                "status": "errored",
                "error": {
                    "name": error.name(),
                    "message": error.to_string(),
                },
                "statusCode": status,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
