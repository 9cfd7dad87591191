//! Core data models for the tenki CLI
//!
//! This module contains the data types used throughout the application
//! for representing weather observations and the errors that can occur
//! while resolving them.

pub mod openweather;

pub use openweather::OpenWeatherClient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base URL for OpenWeatherMap's weather icon images
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Temperature unit requested from the weather API
///
/// Serialized lowercase so the variant name doubles as the `units` query
/// parameter value expected by OpenWeatherMap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Celsius temperatures
    #[default]
    Metric,
    /// Fahrenheit temperatures
    Imperial,
}

impl Unit {
    /// Returns the value used for the API's `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Returns the display symbol for temperatures in this unit
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Metric => "℃",
            Self::Imperial => "℉",
        }
    }
}

/// A resolved current-weather observation for one city
///
/// Created only from a successful API response and read-only afterwards;
/// a later fetch supersedes it in the cache rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// City name as reported by the API (falls back to the requested location)
    pub city: String,
    /// Human-readable conditions, localized by the API (may be empty)
    pub description: String,
    /// Current temperature, rounded to one decimal place
    pub temperature: f64,
    /// Feels-like temperature, rounded to one decimal place
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Opaque icon identifier, resolvable to an image URL
    pub icon_id: String,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Returns the URL of the 2x weather icon for this observation
    pub fn icon_url(&self) -> String {
        format!("{}/{}@2x.png", ICON_BASE_URL, self.icon_id)
    }
}

/// Consumer-facing rendering payload for one observation
///
/// Everything the presentation layer needs, with the unit symbol and the
/// icon URL already resolved. This is what `--json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    /// City name
    pub city: String,
    /// Human-readable conditions
    pub description: String,
    /// Current temperature
    pub temperature: f64,
    /// Feels-like temperature
    pub feels_like: f64,
    /// Relative humidity percentage
    pub humidity: u8,
    /// Display symbol for the temperature fields
    pub unit: &'static str,
    /// Fully resolved icon image URL
    pub icon_url: String,
    /// When the underlying observation was fetched
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReport {
    /// Builds a report from an observation and the unit it was requested in
    pub fn new(observation: &WeatherObservation, unit: Unit) -> Self {
        Self {
            city: observation.city.clone(),
            description: observation.description.clone(),
            temperature: observation.temperature,
            feels_like: observation.feels_like,
            humidity: observation.humidity,
            unit: unit.symbol(),
            icon_url: observation.icon_url(),
            fetched_at: observation.fetched_at,
        }
    }
}

/// Errors that can occur while resolving a weather observation
///
/// All variants are recoverable at the call site; none is ever written to
/// the cache, so the next invocation retries the remote call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No API key is configured
    #[error("API key is not configured")]
    MissingCredential,

    /// The HTTP request itself failed (network error, timeout, or an
    /// error status with no parseable body)
    #[error("request failed: {0}")]
    Transport(String),

    /// The service responded but rejected the request (e.g. unknown city)
    #[error("weather service rejected the request: {0}")]
    UpstreamRejected(String),
}

impl FetchError {
    /// Stable machine-readable tag for structured error output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing-credential",
            Self::Transport(_) => "transport-error",
            Self::UpstreamRejected(_) => "upstream-rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_query_values() {
        assert_eq!(Unit::Metric.as_query(), "metric");
        assert_eq!(Unit::Imperial.as_query(), "imperial");
    }

    #[test]
    fn test_unit_symbols() {
        assert_eq!(Unit::Metric.symbol(), "℃");
        assert_eq!(Unit::Imperial.symbol(), "℉");
    }

    #[test]
    fn test_unit_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Unit::Metric).unwrap(), "\"metric\"");
        assert_eq!(
            serde_json::to_string(&Unit::Imperial).unwrap(),
            "\"imperial\""
        );
    }

    #[test]
    fn test_icon_url() {
        let observation = WeatherObservation {
            city: "Tokyo".to_string(),
            description: "晴れ".to_string(),
            temperature: 25.3,
            feels_like: 26.1,
            humidity: 55,
            icon_id: "01d".to_string(),
            fetched_at: Utc::now(),
        };

        assert_eq!(
            observation.icon_url(),
            "https://openweathermap.org/img/wn/01d@2x.png"
        );
    }

    #[test]
    fn test_report_carries_unit_symbol_and_icon_url() {
        let observation = WeatherObservation {
            city: "Tokyo".to_string(),
            description: "晴れ".to_string(),
            temperature: 25.3,
            feels_like: 26.1,
            humidity: 55,
            icon_id: "10n".to_string(),
            fetched_at: Utc::now(),
        };

        let report = WeatherReport::new(&observation, Unit::Imperial);
        assert_eq!(report.city, "Tokyo");
        assert_eq!(report.unit, "℉");
        assert_eq!(
            report.icon_url,
            "https://openweathermap.org/img/wn/10n@2x.png"
        );
        assert_eq!(report.humidity, 55);
    }

    #[test]
    fn test_fetch_error_kinds() {
        assert_eq!(FetchError::MissingCredential.kind(), "missing-credential");
        assert_eq!(
            FetchError::Transport("timed out".to_string()).kind(),
            "transport-error"
        );
        assert_eq!(
            FetchError::UpstreamRejected("city not found".to_string()).kind(),
            "upstream-rejected"
        );
    }

    #[test]
    fn test_observation_serialization_roundtrip() {
        let observation = WeatherObservation {
            city: "Osaka".to_string(),
            description: "曇り".to_string(),
            temperature: 18.5,
            feels_like: 17.9,
            humidity: 71,
            icon_id: "04d".to_string(),
            fetched_at: Utc::now(),
        };

        let json = serde_json::to_string(&observation).expect("Failed to serialize");
        let parsed: WeatherObservation =
            serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(parsed, observation);
    }
}
