use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
    error::WeatherError,
    model::{Conditions, Temperature},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeatherMap "current weather" endpoint.
///
/// Holds only immutable configuration, so one instance can serve
/// concurrent callers.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WeatherError::ClientBuild)?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Point the client at another endpoint, e.g. a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL. The location is form-encoded (`' '` -> `+`,
    /// `','` -> `%2C`); the key is inserted as-is.
    pub fn format_url(&self, location: &str) -> String {
        let escaped: String = form_urlencoded::byte_serialize(location.as_bytes()).collect();
        format!("{}/data/2.5/weather?q={}&appid={}", self.base_url, escaped, self.api_key)
    }

    pub async fn get_weather(&self, location: &str) -> Result<Conditions, WeatherError> {
        let url = self.format_url(location);
        debug!("Requesting current weather for {location:?} from {}", self.base_url);

        let res = self.http.get(&url).send().await.map_err(|e| {
            // reqwest includes the URL in its message, and the URL holds the key.
            WeatherError::Http(e.without_url())
        })?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            warn!("OpenWeatherMap has no match for {location:?}");
            return Err(WeatherError::LocationNotFound(location.to_string()));
        }
        if status != StatusCode::OK {
            warn!("OpenWeatherMap answered with status {status}");
            return Err(WeatherError::UnexpectedStatus(status.to_string()));
        }

        let body = res.bytes().await.map_err(|e| WeatherError::Body(e.without_url()))?;
        debug!("Received {} bytes from OpenWeatherMap", body.len());

        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Temperature,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    weather: Option<Vec<OwWeather>>,
    main: OwMain,
}

/// Convert a raw "current weather" payload into [`Conditions`].
///
/// Only the first weather entry is used; unknown fields are ignored.
pub fn parse_response(data: &[u8]) -> Result<Conditions, WeatherError> {
    let raw = || String::from_utf8_lossy(data).into_owned();

    // A bare `null` payload decodes fine but carries no weather at all.
    let parsed: Option<OwCurrentResponse> = serde_json::from_slice(data)
        .map_err(|source| WeatherError::Decode { raw: raw(), source })?;
    let parsed = parsed.ok_or_else(|| WeatherError::MissingWeather { raw: raw() })?;

    let first = parsed
        .weather
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingWeather { raw: raw() })?;

    if first.main.is_empty() {
        return Err(WeatherError::EmptySummary { raw: raw() });
    }

    Ok(Conditions { summary: first.main, temperature: parsed.main.temp })
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn get_weather(&self, location: &str) -> Result<Conditions, WeatherError> {
        OpenWeatherClient::get_weather(self, location).await
    }
}
