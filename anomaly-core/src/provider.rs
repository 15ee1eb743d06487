use async_trait::async_trait;
use std::fmt::Debug;

use crate::{DayQuery, error::FetchError};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of hourly historical temperatures.
#[async_trait]
pub trait HistoricalWeather: Send + Sync + Debug {
    /// Hourly temperature readings for the day containing `query.dt`, earliest first.
    async fn hourly_temperatures(&self, query: &DayQuery) -> Result<Vec<f64>, FetchError>;
}
