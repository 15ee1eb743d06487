//! Single core entry point and the platform adapters built on it.
//!
//! Every platform receives some event shape, hands the core a JSON request and
//! translates the resulting [`CoreResponse`] back into what the platform expects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    CoreResponse, DEFAULT_JOB_ID, calculator::DeviationCalculator, error::AdapterError,
    provider::HistoricalWeather, resolver,
};

/// Validates a request, runs the calculator and shapes the response.
#[derive(Debug, Clone)]
pub struct Adapter<P> {
    calculator: DeviationCalculator<P>,
}

impl<P: HistoricalWeather> Adapter<P> {
    pub fn new(calculator: DeviationCalculator<P>) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &DeviationCalculator<P> {
        &self.calculator
    }

    /// Run one request. Never fails: errors become a failure response carrying the request id.
    pub async fn execute(&self, input: &Value) -> CoreResponse {
        let id = resolver::job_id(input);

        let result = match resolver::resolve(input) {
            Ok(request) => self.calculator.evaluate(&request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(result) => CoreResponse::success(&result),
            Err(e) => {
                tracing::warn!(message = "request failed", id = %id, error = %e);
                CoreResponse::failure(id, &e)
            }
        }
    }
}

/// Translates a platform-specific event into a core invocation and back.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    type Event: Send + 'static;
    type Output;

    async fn invoke(&self, event: Self::Event) -> Self::Output;
}

/// Plain HTTP handler: JSON request body in, status and JSON body out.
#[derive(Debug)]
pub struct HttpHandler<P> {
    adapter: Arc<Adapter<P>>,
}

impl<P> HttpHandler<P> {
    pub fn new(adapter: Arc<Adapter<P>>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl<P: HistoricalWeather + 'static> PlatformAdapter for HttpHandler<P> {
    type Event = Value;
    type Output = CoreResponse;

    async fn invoke(&self, event: Value) -> CoreResponse {
        self.adapter.execute(&event).await
    }
}

/// Callback-style function handler: the event is the request and only the body is returned.
#[derive(Debug)]
pub struct LambdaHandler<P> {
    adapter: Arc<Adapter<P>>,
}

impl<P> LambdaHandler<P> {
    pub fn new(adapter: Arc<Adapter<P>>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl<P: HistoricalWeather + 'static> PlatformAdapter for LambdaHandler<P> {
    type Event = Value;
    type Output = Value;

    async fn invoke(&self, event: Value) -> Value {
        self.adapter.execute(&event).await.body
    }
}

/// Event of the versioned function signature, carrying the request as a JSON string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LambdaV2Event {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaV2Response {
    pub status_code: u16,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<CoreResponse> for LambdaV2Response {
    fn from(res: CoreResponse) -> Self {
        Self {
            status_code: res.status,
            body: res.body.to_string(),
            is_base64_encoded: false,
        }
    }
}

/// Versioned function handler: parses a string body and returns a stringified body.
#[derive(Debug)]
pub struct LambdaV2Handler<P> {
    adapter: Arc<Adapter<P>>,
}

impl<P> LambdaV2Handler<P> {
    pub fn new(adapter: Arc<Adapter<P>>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl<P: HistoricalWeather + 'static> PlatformAdapter for LambdaV2Handler<P> {
    type Event = LambdaV2Event;
    type Output = LambdaV2Response;

    async fn invoke(&self, event: LambdaV2Event) -> LambdaV2Response {
        let parsed = event
            .body
            .as_deref()
            .ok_or_else(|| AdapterError::Validation("event has no body".to_string()))
            .and_then(|body| {
                serde_json::from_str::<Value>(body).map_err(|e| {
                    AdapterError::Validation(format!("event body is not valid JSON: {e}"))
                })
            });

        let res = match parsed {
            Ok(input) => self.adapter.execute(&input).await,
            Err(e) => CoreResponse::failure(Value::String(DEFAULT_JOB_ID.to_string()), &e),
        };

        res.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DayQuery, error::FetchError};
    use serde_json::json;

    #[derive(Debug)]
    struct FixedWeather(Result<f64, ()>);

    #[async_trait]
    impl HistoricalWeather for FixedWeather {
        async fn hourly_temperatures(&self, _query: &DayQuery) -> Result<Vec<f64>, FetchError> {
            match self.0 {
                Ok(t) => Ok(vec![t; 24]),
                Err(()) => Err(FetchError::Custom("{\"Response\":\"Error\"}".into())),
            }
        }
    }

    fn adapter(weather: FixedWeather) -> Arc<Adapter<FixedWeather>> {
        Arc::new(Adapter::new(DeviationCalculator::new(weather)))
    }

    fn input() -> Value {
        json!({ "id": "abc", "data": { "lat": 10.0, "lon": 20.0 } })
    }

    #[tokio::test]
    async fn execute_success() {
        let res = adapter(FixedWeather(Ok(280.0))).execute(&input()).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({ "id": "abc", "data": { "answer": false } }));
    }

    #[tokio::test]
    async fn execute_validation_failure_echoes_id() {
        let res = adapter(FixedWeather(Ok(280.0)))
            .execute(&json!({ "id": 99, "data": { "lon": 20.0 } }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["id"], json!(99));
        assert!(res.body.get("data").is_none());
    }

    #[tokio::test]
    async fn execute_upstream_failure_echoes_id() {
        let res = adapter(FixedWeather(Err(()))).execute(&input()).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["id"], "abc");
        assert_eq!(res.body["error"]["name"], "UpstreamFetchError");
        assert!(res.body.get("data").is_none());
    }

    #[tokio::test]
    async fn http_handler_returns_status_and_body() {
        let handler = HttpHandler::new(adapter(FixedWeather(Ok(1.0))));
        let res = handler.invoke(input()).await;
        assert!(res.is_success());
        assert_eq!(res.body["data"]["answer"], false);
    }

    #[tokio::test]
    async fn lambda_handler_returns_body_only() {
        let handler = LambdaHandler::new(adapter(FixedWeather(Err(()))));
        let body = handler.invoke(input()).await;
        assert_eq!(body["id"], "abc");
        assert_eq!(body["statusCode"], 500);
    }

    #[tokio::test]
    async fn lambda_v2_handler_stringifies_body() {
        let handler = LambdaV2Handler::new(adapter(FixedWeather(Ok(5.0))));
        let res = handler
            .invoke(LambdaV2Event {
                body: Some(input().to_string()),
            })
            .await;

        assert_eq!(res.status_code, 200);
        assert!(!res.is_base64_encoded);

        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body, json!({ "id": "abc", "data": { "answer": false } }));

        let wire = serde_json::to_value(&res).unwrap();
        assert_eq!(wire["statusCode"], 200);
        assert_eq!(wire["isBase64Encoded"], false);
    }

    #[tokio::test]
    async fn lambda_v2_handler_rejects_bad_body() {
        let handler = LambdaV2Handler::new(adapter(FixedWeather(Ok(5.0))));

        let res = handler
            .invoke(LambdaV2Event {
                body: Some("{not json".into()),
            })
            .await;
        assert_eq!(res.status_code, 400);

        let res = handler.invoke(LambdaV2Event::default()).await;
        assert_eq!(res.status_code, 400);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["id"], "1");
    }
}
