//! Current weather at the farm location.
//!
//! Queries the OpenWeatherMap "current weather" endpoint once per request.
//! Failures are reported as a [`WeatherError`]; the dashboard turns any of
//! them into a single "unavailable" notice.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Why the weather could not be shown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// The request failed or the API returned an error status.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not valid JSON.
    #[error("could not parse response: {0}")]
    Parse(String),

    /// A required field was absent or had the wrong type.
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Network(err.to_string())
    }
}

/// Where and how to ask for the weather.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub endpoint: String,
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `metric`, `imperial` or `standard`.
    pub units: String,
    /// Request timeout in seconds; transport default when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            latitude: 21.1458,
            longitude: 79.0882,
            units: "metric".to_string(),
            timeout_secs: None,
        }
    }
}

/// Display units for a [`WeatherSettings::units`] system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabels {
    pub temperature: &'static str,
    pub wind: &'static str,
}

impl WeatherSettings {
    /// Whether requests can be made at all.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn unit_labels(&self) -> UnitLabels {
        match self.units.as_str() {
            "imperial" => UnitLabels {
                temperature: "°F",
                wind: "mph",
            },
            "standard" => UnitLabels {
                temperature: "K",
                wind: "m/s",
            },
            _ => UnitLabels {
                temperature: "°C",
                wind: "m/s",
            },
        }
    }
}

/// Current conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    pub temperature: f64,
    /// Title-cased description, e.g. "Scattered Clouds".
    pub condition: String,
    /// Relative humidity in percent.
    pub humidity: f64,
    pub wind_speed: f64,
}

impl Weather {
    /// Extract the fields shown on the dashboard from an API response.
    pub fn from_json(body: &Value) -> Result<Self, WeatherError> {
        let temperature = body
            .pointer("/main/temp")
            .and_then(Value::as_f64)
            .ok_or(WeatherError::MissingField("main.temp"))?;
        let condition = body
            .pointer("/weather/0/description")
            .and_then(Value::as_str)
            .ok_or(WeatherError::MissingField("weather[0].description"))?;
        let humidity = body
            .pointer("/main/humidity")
            .and_then(Value::as_f64)
            .ok_or(WeatherError::MissingField("main.humidity"))?;
        let wind_speed = body
            .pointer("/wind/speed")
            .and_then(Value::as_f64)
            .ok_or(WeatherError::MissingField("wind.speed"))?;

        Ok(Self {
            temperature,
            condition: title_case(condition),
            humidity,
            wind_speed,
        })
    }

    /// Parse a raw response body.
    pub fn parse(body: &str) -> Result<Self, WeatherError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        Self::from_json(&value)
    }
}

/// Capitalize the first letter of every word, lowercase the rest.
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// HTTP client for the weather API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    settings: WeatherSettings,
}

impl WeatherClient {
    pub fn new(settings: WeatherSettings, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_default();
        Self { client, settings }
    }

    pub fn settings(&self) -> &WeatherSettings {
        &self.settings
    }

    /// Fetch current conditions. No retries.
    pub async fn current(&self) -> Result<Weather, WeatherError> {
        let s = &self.settings;
        let response = self
            .client
            .get(&s.endpoint)
            .query(&[
                ("lat", s.latitude.to_string()),
                ("lon", s.longitude.to_string()),
                ("appid", s.api_key.clone()),
                ("units", s.units.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::Network(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Weather::parse(&body)
    }
}
