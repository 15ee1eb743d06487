//! Core library for the temperature anomaly adapter.
//!
//! Given a coordinate, the adapter fetches five days of hourly history from the
//! OpenWeather One Call API and reports whether today's average temperature lies
//! more than half a standard deviation away from the mean of the four days before it.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Request validation and the response envelopes
//! - The historical weather provider and its retry loop
//! - The deviation statistic and calculator
//! - Adapters for plain HTTP and function-style invocation
//!
//! It is used by `anomaly-cli`, but can also be embedded in other binaries or services.

pub mod adapter;
pub mod calculator;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod retry;
pub mod stats;

pub use adapter::{
    Adapter, HttpHandler, LambdaHandler, LambdaV2Event, LambdaV2Handler, LambdaV2Response,
    PlatformAdapter,
};
pub use calculator::DeviationCalculator;
pub use config::Config;
pub use error::{AdapterError, FetchError};
pub use model::{
    CoreResponse, DEFAULT_ENDPOINT, DEFAULT_JOB_ID, DayQuery, DeviationResult, JobId,
    ValidatedRequest,
};
pub use provider::{HistoricalWeather, OpenWeatherProvider};
pub use retry::RetryPolicy;
pub use stats::{Baseline, TemperatureWindow};
