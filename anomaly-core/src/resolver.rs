//! Validation of incoming adapter requests.
//!
//! Input has the shape `{ "id": <any>, "data": { "lat": .., "lon": .., "endpoint"?: .. } }`.
//! Coordinates may be JSON numbers or numeric strings.

use serde_json::{Map, Value};

use crate::error::AdapterError;
use crate::model::{DEFAULT_ENDPOINT, DEFAULT_JOB_ID, JobId, ValidatedRequest};

/// Correlation id of a raw request, or the default id when it has none.
///
/// Usable on inputs that fail validation so that error responses still echo an id.
pub fn job_id(raw: &Value) -> JobId {
    match raw.get("id") {
        None | Some(Value::Null) => Value::String(DEFAULT_JOB_ID.to_string()),
        Some(id) => id.clone(),
    }
}

/// Validate a raw request and derive its parameters. No I/O is performed.
pub fn resolve(raw: &Value) -> Result<ValidatedRequest, AdapterError> {
    let input = raw
        .as_object()
        .ok_or_else(|| AdapterError::Validation("request must be a JSON object".to_string()))?;

    let data = match input.get("data") {
        Some(Value::Object(data)) => data,
        Some(Value::Null) | None => {
            return Err(AdapterError::Validation(
                "Required parameter not supplied: data".to_string(),
            ));
        }
        Some(_) => {
            return Err(AdapterError::Validation("data must be a JSON object".to_string()));
        }
    };

    let latitude = coordinate(data, "lat")?;
    let longitude = coordinate(data, "lon")?;
    let endpoint = endpoint(data)?;

    Ok(ValidatedRequest {
        id: job_id(raw),
        latitude,
        longitude,
        endpoint,
    })
}

fn coordinate(data: &Map<String, Value>, field: &str) -> Result<f64, AdapterError> {
    let value = match data.get(field) {
        None | Some(Value::Null) => {
            return Err(AdapterError::Validation(format!(
                "Required parameter not supplied: {field}"
            )));
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| AdapterError::Validation(format!("Invalid numeric value for {field}")))
}

fn endpoint(data: &Map<String, Value>) -> Result<String, AdapterError> {
    match data.get("endpoint") {
        None | Some(Value::Null) => Ok(DEFAULT_ENDPOINT.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(DEFAULT_ENDPOINT.to_string()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(AdapterError::Validation("endpoint must be a string".to_string())),
    }
}
