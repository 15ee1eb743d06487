//! Temperature deviation calculator.
//!
//! Fetches five consecutive days ending today, reduces each day to its average
//! temperature and flags today when it falls outside half a standard deviation
//! of the prior four days.

use chrono::Utc;
use futures::future::try_join_all;

use crate::{
    DayQuery, DeviationResult, ValidatedRequest,
    error::AdapterError,
    provider::HistoricalWeather,
    stats::{TemperatureWindow, WINDOW_DAYS, daily_average},
};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// One query per day of the window, most recent first, spaced exactly one day apart.
pub fn day_queries(request: &ValidatedRequest, dt0: i64) -> Vec<DayQuery> {
    (0..WINDOW_DAYS as i64)
        .map(|i| DayQuery {
            latitude: request.latitude,
            longitude: request.longitude,
            dt: dt0 - i * SECONDS_PER_DAY,
            endpoint: request.endpoint.clone(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DeviationCalculator<P> {
    provider: P,
}

impl<P: HistoricalWeather> DeviationCalculator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Evaluate the request against the window ending now.
    pub async fn evaluate(&self, request: &ValidatedRequest) -> Result<DeviationResult, AdapterError> {
        self.evaluate_at(request, Utc::now().timestamp()).await
    }

    /// Evaluate the request against the window ending at unix time `dt0`.
    pub async fn evaluate_at(
        &self,
        request: &ValidatedRequest,
        dt0: i64,
    ) -> Result<DeviationResult, AdapterError> {
        let window = self.fetch_window(request, dt0).await?;
        let baseline = window.baseline();
        let answer = baseline.is_anomalous(window.today());

        tracing::info!(
            message = "computed temperature deviation",
            id = %request.id,
            today = window.today(),
            mean = baseline.mean,
            standard_deviation = baseline.standard_deviation,
            answer = answer,
        );

        Ok(DeviationResult {
            id: request.id.clone(),
            answer,
        })
    }

    /// Fetch all days of the window concurrently.
    ///
    /// The first failure resolves the whole window; results of the other days are dropped.
    pub async fn fetch_window(
        &self,
        request: &ValidatedRequest,
        dt0: i64,
    ) -> Result<TemperatureWindow, AdapterError> {
        let fetches = day_queries(request, dt0).into_iter().map(|query| async move {
            let hourly = self
                .provider
                .hourly_temperatures(&query)
                .await
                .map_err(AdapterError::from)?;
            daily_average(&hourly)
        });

        let averages = try_join_all(fetches).await?;

        let mut days = [0.0; WINDOW_DAYS];
        for (slot, avg) in days.iter_mut().zip(averages) {
            *slot = avg;
        }

        Ok(TemperatureWindow::new(days))
    }
}
