use thiserror::Error;

/// Everything that can go wrong while fetching current conditions.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP client could not be set up (e.g. no usable TLS backend).
    #[error("failed to initialise HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    /// DNS, connect or timeout failure. The message is the transport's own.
    #[error(transparent)]
    Http(reqwest::Error),

    #[error("could not find location: {0}")]
    LocationNotFound(String),

    #[error("unexpected response status \"{0}\"")]
    UnexpectedStatus(String),

    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),

    #[error("invalid API response {raw}: {source}")]
    Decode {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API response {raw}: require at least one weather element")]
    MissingWeather { raw: String },

    #[error("invalid API response {raw}: weather element has an empty summary")]
    EmptySummary { raw: String },
}

impl WeatherError {
    /// True when the upstream answered 404 for the requested location.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::LocationNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_location() {
        let err = WeatherError::LocationNotFound("Atlantis".into());
        assert_eq!(err.to_string(), "could not find location: Atlantis");
        assert!(err.is_not_found());
    }

    #[test]
    fn unexpected_status_quotes_status_text() {
        let err = WeatherError::UnexpectedStatus("500 Internal Server Error".into());
        assert_eq!(err.to_string(), "unexpected response status \"500 Internal Server Error\"");
        assert!(!err.is_not_found());
    }

    #[test]
    fn client_build_is_distinct_from_transport_errors() {
        let inner = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("relative URL must be rejected");

        let err = WeatherError::ClientBuild(inner);
        assert!(err.to_string().starts_with("failed to initialise HTTP client: "));
        assert!(!matches!(err, WeatherError::Http(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn missing_weather_carries_payload() {
        let err = WeatherError::MissingWeather { raw: r#"{"weather":[]}"#.into() };
        assert_eq!(
            err.to_string(),
            r#"invalid API response {"weather":[]}: require at least one weather element"#
        );
    }
}
