//! Daily averages and the baseline statistic used to flag anomalous days.
//!
//! The baseline is computed over the four prior days only. Today's average never
//! contributes to the mean or standard deviation it is compared against.

use crate::error::AdapterError;

pub const HOURS_PER_DAY: usize = 24;
pub const WINDOW_DAYS: usize = 5;

/// Arithmetic mean of the first 24 hourly readings of a day.
///
/// A series shorter than a full day is rejected rather than averaged.
pub fn daily_average(hourly: &[f64]) -> Result<f64, AdapterError> {
    if hourly.len() < HOURS_PER_DAY {
        return Err(AdapterError::DataShape {
            expected: HOURS_PER_DAY,
            actual: hourly.len(),
        });
    }

    let sum: f64 = hourly[..HOURS_PER_DAY].iter().sum();
    Ok(sum / HOURS_PER_DAY as f64)
}

/// Mean and population standard deviation of the prior days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub mean: f64,
    pub standard_deviation: f64,
}

impl Baseline {
    /// True when `value` lies strictly outside `mean ± standard_deviation / 2`.
    pub fn is_anomalous(&self, value: f64) -> bool {
        let half = self.standard_deviation / 2.0;
        value > self.mean + half || value < self.mean - half
    }
}

/// Daily average temperatures, index 0 is today and index 4 is four days ago.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureWindow([f64; WINDOW_DAYS]);

impl TemperatureWindow {
    pub fn new(days: [f64; WINDOW_DAYS]) -> Self {
        Self(days)
    }

    pub fn today(&self) -> f64 {
        self.0[0]
    }

    pub fn days(&self) -> &[f64; WINDOW_DAYS] {
        &self.0
    }

    pub fn baseline(&self) -> Baseline {
        let prior = &self.0[1..];
        let n = prior.len() as f64;

        let mean = prior.iter().sum::<f64>() / n;
        let variance = prior.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

        Baseline {
            mean,
            standard_deviation: variance.sqrt(),
        }
    }

    pub fn is_anomalous(&self) -> bool {
        self.baseline().is_anomalous(self.today())
    }
}
