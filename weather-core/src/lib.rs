//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The OpenWeatherMap client (URL building, transport, response parsing)
//! - Shared domain models (conditions, Kelvin-based temperatures)
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::WeatherError;
pub use model::{Conditions, Temperature, Unit};
pub use provider::{
    WeatherProvider, get,
    openweather::{OpenWeatherClient, parse_response},
};
