use crate::{
    Conditions, WeatherError,
    provider::openweather::{DEFAULT_BASE_URL, OpenWeatherClient},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, location: &str) -> Result<Conditions, WeatherError>;
}

/// One-shot lookup against the production endpoint with a fresh client.
pub async fn get(location: &str, api_key: &str) -> Result<Conditions, WeatherError> {
    get_from(DEFAULT_BASE_URL, location, api_key).await
}

async fn get_from(
    base_url: &str,
    location: &str,
    api_key: &str,
) -> Result<Conditions, WeatherError> {
    let client = OpenWeatherClient::new(api_key)?.with_base_url(base_url);
    client.get_weather(location).await
}
