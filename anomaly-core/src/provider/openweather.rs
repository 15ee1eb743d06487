use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Config, DayQuery,
    error::FetchError,
    retry::{ErrorPredicate, RetryPolicy, response_is_error, with_retry},
};

use super::HistoricalWeather;

/// Client for the OpenWeather One Call historical endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: Url,
    http: Client,
    retry: RetryPolicy,
    is_error: ErrorPredicate,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        base_url: &str,
        http: Client,
        retry: RetryPolicy,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::Url(format!("{base_url} cannot be used as a base URL")));
        }

        Ok(Self {
            api_key,
            base_url,
            http,
            retry,
            is_error: response_is_error,
        })
    }

    /// Build a provider from configuration. Fails when no API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Self::new(api_key, &config.api_url, http, config.retry_policy())
            .with_context(|| format!("Invalid weather API URL: {}", config.api_url))
    }

    /// Replace the predicate used to detect error bodies that should be retried.
    pub fn with_error_predicate(mut self, is_error: ErrorPredicate) -> Self {
        self.is_error = is_error;
        self
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .push(endpoint);

        Ok(url)
    }

    async fn fetch_once(&self, url: &Url, query: &DayQuery) -> Result<Vec<f64>, FetchError> {
        let res = self
            .http
            .get(url.clone())
            .query(&OwQuery {
                lat: query.latitude,
                lon: query.longitude,
                dt: query.dt,
                appid: &self.api_key,
            })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        if (self.is_error)(&value) {
            return Err(FetchError::Custom(truncate_body(&body)));
        }

        let parsed: OwTimeMachineResponse = serde_json::from_value(value)?;
        Ok(parsed.hourly.into_iter().map(|h| h.temp).collect())
    }
}

#[derive(Debug, Serialize)]
struct OwQuery<'a> {
    lat: f64,
    lon: f64,
    dt: i64,
    appid: &'a str,
}

#[derive(Debug, Deserialize)]
struct OwHour {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwTimeMachineResponse {
    hourly: Vec<OwHour>,
}

#[async_trait]
impl HistoricalWeather for OpenWeatherProvider {
    async fn hourly_temperatures(&self, query: &DayQuery) -> Result<Vec<f64>, FetchError> {
        let url = self.endpoint_url(&query.endpoint)?;
        tracing::debug!(message = "requesting historical weather", url = %url, dt = query.dt);

        let url = &url;
        let hourly = with_retry(self.retry, move || self.fetch_once(url, query)).await?;

        tracing::debug!(message = "received hourly temperatures", dt = query.dt, hours = hourly.len());
        Ok(hourly)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
