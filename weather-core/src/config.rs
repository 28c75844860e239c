use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{model::Unit, provider::openweather::OpenWeatherClient};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "http://localhost:8080"
/// unit = "fahrenheit"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the production OpenWeatherMap endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Display unit used when no flag is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Pick the API key: a non-empty environment value wins over the stored one.
    ///
    /// Fails before any network activity when neither is present.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "Please set the environment variable {API_KEY_ENV}.\n\
                     Hint: or run `weather configure` and enter your API key."
                )
            })
    }

    pub fn unit(&self) -> Unit {
        self.unit.unwrap_or_default()
    }

    /// Build a client for `api_key`, honouring a stored `base_url` override.
    pub fn client(&self, api_key: &str) -> Result<OpenWeatherClient> {
        let client =
            OpenWeatherClient::new(api_key).context("Failed to initialise the HTTP client")?;

        Ok(match self.base_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => client.with_base_url(url),
            None => client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::DEFAULT_BASE_URL;

    #[test]
    fn resolve_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Please set the environment variable OPENWEATHERMAP_API_KEY"));
        assert!(msg.contains("Hint: or run `weather configure`"));
    }

    #[test]
    fn resolve_api_key_prefers_environment() {
        let cfg = Config { api_key: Some("STORED".into()), ..Config::default() };

        let key = cfg.resolve_api_key(Some("FROM_ENV".into())).expect("key must resolve");
        assert_eq!(key, "FROM_ENV");
    }

    #[test]
    fn resolve_api_key_falls_back_to_stored_key() {
        let cfg = Config { api_key: Some("STORED".into()), ..Config::default() };

        assert_eq!(cfg.resolve_api_key(None).expect("key must resolve"), "STORED");
        assert_eq!(cfg.resolve_api_key(Some(String::new())).expect("key must resolve"), "STORED");
    }

    #[test]
    fn resolve_api_key_treats_blank_values_as_absent() {
        let cfg = Config { api_key: Some("  ".into()), ..Config::default() };
        assert!(cfg.resolve_api_key(Some(" ".into())).is_err());
    }

    #[test]
    fn unit_defaults_to_celsius() {
        assert_eq!(Config::default().unit(), Unit::Celsius);

        let cfg = Config { unit: Some(Unit::Fahrenheit), ..Config::default() };
        assert_eq!(cfg.unit(), Unit::Fahrenheit);
    }

    #[test]
    fn client_uses_base_url_override() {
        let cfg = Config::default();
        assert_eq!(cfg.client("KEY").expect("client").base_url(), DEFAULT_BASE_URL);

        let cfg = Config { base_url: Some("http://localhost:9999".into()), ..Config::default() };
        assert_eq!(cfg.client("KEY").expect("client").base_url(), "http://localhost:9999");
    }

    #[test]
    fn load_from_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_to_then_load_from_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("OPEN_KEY".into()),
            base_url: None,
            unit: Some(Unit::Fahrenheit),
        };
        cfg.save_to(&path).expect("save");

        let contents = fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("unit = \"fahrenheit\""));
        assert!(!contents.contains("base_url"));

        assert_eq!(Config::load_from(&path).expect("load"), cfg);
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit = \"kelvin\"").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
