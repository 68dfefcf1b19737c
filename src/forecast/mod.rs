//! Forecast Module
//!
//! Supplies the required productivity as an ordered series of
//! `(timestamp, value)` samples. The engine only ever consumes the latest
//! value, so any source that can produce a series plugs in through
//! [`ForecastProvider`].
//!
//! ## Providers
//!
//! - [`CsvForecastProvider`]: local CSV file (`timestamp,val` rows)
//! - [`StaticForecast`]: fixed in-memory series
//! - [`FallbackForecast`]: wraps another provider and substitutes the
//!   built-in series when it fails or returns nothing

mod csv_provider;

pub use csv_provider::CsvForecastProvider;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// One forecast point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Forecast I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Forecast CSV has no header row")]
    MissingHeader,
    #[error("Forecast CSV header lacks a '{0}' column")]
    MissingColumn(&'static str),
    #[error("Forecast series is empty")]
    Empty,
}

/// Source of forecast samples, ordered by timestamp ascending.
pub trait ForecastProvider: Send + Sync {
    fn samples(&self) -> Result<Vec<ForecastSample>, ForecastError>;

    /// Short description for logs.
    fn describe(&self) -> String;

    /// Latest finite value of the series.
    fn latest_value(&self) -> Result<f64, ForecastError> {
        latest_value(&self.samples()?).ok_or(ForecastError::Empty)
    }
}

/// Last finite value of an ordered series.
pub fn latest_value(samples: &[ForecastSample]) -> Option<f64> {
    samples.iter().rev().map(|s| s.value).find(|v| v.is_finite())
}

// ============================================================================
// Static Series
// ============================================================================

/// Fixed in-memory series.
#[derive(Debug, Clone, Default)]
pub struct StaticForecast {
    samples: Vec<ForecastSample>,
}

impl StaticForecast {
    /// Samples are sorted by timestamp on construction.
    pub fn new(mut samples: Vec<ForecastSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    /// The built-in series used when no forecast can be read.
    pub fn builtin() -> Self {
        Self::new(builtin_series())
    }
}

impl ForecastProvider for StaticForecast {
    fn samples(&self) -> Result<Vec<ForecastSample>, ForecastError> {
        Ok(self.samples.clone())
    }

    fn describe(&self) -> String {
        format!("static series ({} samples)", self.samples.len())
    }
}

/// Seven daily values starting 2024-01-01, ending at 58.0.
const BUILTIN_START_EPOCH: i64 = 1_704_067_200;
const BUILTIN_VALUES: [f64; 7] = [52.0, 53.5, 54.2, 55.0, 56.1, 57.3, 58.0];

pub fn builtin_series() -> Vec<ForecastSample> {
    BUILTIN_VALUES
        .iter()
        .enumerate()
        .filter_map(|(day, &value)| {
            DateTime::from_timestamp(BUILTIN_START_EPOCH + day as i64 * 86_400, 0)
                .map(|timestamp| ForecastSample { timestamp, value })
        })
        .collect()
}

// ============================================================================
// Fallback Wrapper
// ============================================================================

/// Wraps a provider; on error or an empty series, returns the fallback.
pub struct FallbackForecast<P> {
    inner: P,
    fallback: StaticForecast,
}

impl<P: ForecastProvider> FallbackForecast<P> {
    /// Fall back to the built-in series.
    pub fn new(inner: P) -> Self {
        Self::with_fallback(inner, StaticForecast::builtin())
    }

    pub fn with_fallback(inner: P, fallback: StaticForecast) -> Self {
        Self { inner, fallback }
    }
}

impl<P: ForecastProvider> ForecastProvider for FallbackForecast<P> {
    fn samples(&self) -> Result<Vec<ForecastSample>, ForecastError> {
        match self.inner.samples() {
            Ok(samples) if latest_value(&samples).is_some() => {
                debug!(source = %self.inner.describe(), count = samples.len(), "Forecast loaded");
                Ok(samples)
            }
            Ok(_) => {
                warn!(source = %self.inner.describe(), "Forecast series is empty, using fallback series");
                self.fallback.samples()
            }
            Err(e) => {
                warn!(source = %self.inner.describe(), error = %e, "Forecast unavailable, using fallback series");
                self.fallback.samples()
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} (with fallback)", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl ForecastProvider for Failing {
        fn samples(&self) -> Result<Vec<ForecastSample>, ForecastError> {
            Err(ForecastError::MissingHeader)
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[test]
    fn builtin_series_ends_at_58() {
        let series = builtin_series();
        assert_eq!(series.len(), 7);
        assert_eq!(latest_value(&series), Some(58.0));
        assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn fallback_on_error() {
        let provider = FallbackForecast::new(Failing);
        assert_eq!(provider.latest_value().expect("fallback"), 58.0);
    }

    #[test]
    fn fallback_on_empty_series() {
        let provider = FallbackForecast::new(StaticForecast::new(Vec::new()));
        assert_eq!(provider.samples().expect("fallback").len(), 7);
    }

    #[test]
    fn latest_value_skips_trailing_nan() {
        let mut series = builtin_series();
        if let Some(last) = series.last_mut() {
            last.value = f64::NAN;
        }
        assert_eq!(latest_value(&series), Some(57.3));
    }

    #[test]
    fn static_forecast_sorts_samples() {
        let mut series = builtin_series();
        series.reverse();
        let provider = StaticForecast::new(series);
        assert_eq!(provider.latest_value().expect("non-empty"), 58.0);
    }
}
