//! OpenWeatherMap current-weather API client
//!
//! This module fetches current conditions from the OpenWeatherMap API and
//! parses them into our `WeatherObservation` type. The upstream body is
//! decoded as one of two shapes: an observation (which must carry the root
//! `main` block) or a rejection (which may carry a `message`).

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchError, Unit, WeatherObservation};

/// Base URL for the OpenWeatherMap current-weather API
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Language requested for condition descriptions
const DEFAULT_LANGUAGE: &str = "ja";

/// Icon used when the response omits one
const DEFAULT_ICON: &str = "01d";

/// Client for fetching current weather from OpenWeatherMap
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    language: String,
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenWeatherClient {
    /// Create a new client with default settings
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// The caller owns transport concerns such as timeouts; the binary
    /// builds its client with a 10 second timeout.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Override the API base URL (used by tests to point at a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the language requested for condition descriptions
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Fetch the current weather for a city
    ///
    /// Issues exactly one GET request. A transport-level failure (network
    /// error, timeout, error status with an unreadable body) becomes
    /// `FetchError::Transport`; a readable body without the root `main`
    /// block becomes `FetchError::UpstreamRejected` carrying the upstream
    /// message when one is present.
    ///
    /// # Arguments
    /// * `location` - City name as typed by the user (e.g. "Tokyo")
    /// * `unit` - Temperature unit to request
    /// * `api_key` - OpenWeatherMap API key
    pub async fn fetch_current(
        &self,
        location: &str,
        unit: Unit,
        api_key: &str,
    ) -> Result<WeatherObservation, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", location),
                ("appid", api_key),
                ("units", unit.as_query()),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let body: ApiResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(FetchError::Transport(format!(
                    "unreadable response body: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(FetchError::Transport(format!("HTTP {}", status)));
            }
        };

        match body {
            ApiResponse::Observation(observation) => Ok(build_observation(location, observation)),
            ApiResponse::Rejection(rejection) => Err(FetchError::UpstreamRejected(
                rejection
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

/// Builds a `WeatherObservation` from a parsed observation body
///
/// Temperatures are rounded to one decimal place here, at resolution time.
/// Missing optional fields fall back rather than failing: the requested
/// location stands in for the city name, the description may be empty, and
/// the icon defaults to a sensible identifier.
fn build_observation(location: &str, body: ObservationBody) -> WeatherObservation {
    let (description, icon) = body
        .weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_default();

    WeatherObservation {
        city: body
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| location.to_string()),
        description,
        temperature: round_one_decimal(body.main.temp),
        feels_like: round_one_decimal(body.main.feels_like),
        humidity: body.main.humidity.clamp(0.0, 100.0) as u8,
        icon_id: if icon.is_empty() {
            DEFAULT_ICON.to_string()
        } else {
            icon
        },
        fetched_at: Utc::now(),
    }
}

/// Round a value to one decimal place
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// OpenWeatherMap response body, decoded as one of two shapes
///
/// Variant order matters: a body with a `main` block is an observation,
/// anything else that is still a JSON object is a rejection.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Observation(ObservationBody),
    Rejection(RejectionBody),
}

/// Successful observation payload; only `main` is required
#[derive(Debug, Deserialize)]
struct ObservationBody {
    main: MainBlock,
    name: Option<String>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

/// The `main` measurement block
#[derive(Debug, Deserialize)]
struct MainBlock {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
}

/// One entry of the `weather` condition array
#[derive(Debug, Default, Deserialize)]
struct ConditionBlock {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

/// Error payload returned when the API rejects a request
#[derive(Debug, Deserialize)]
struct RejectionBody {
    message: Option<String>,
}
