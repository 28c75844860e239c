use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;

/// Temperature in Kelvin, as reported by the upstream API.
///
/// Conversions happen only when the value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(pub f64);

impl Temperature {
    pub fn kelvin(self) -> f64 {
        self.0
    }

    pub fn celsius(self) -> f64 {
        self.0 - KELVIN_OFFSET
    }

    pub fn fahrenheit(self) -> f64 {
        1.8 * (self.0 - KELVIN_OFFSET) + 32.0
    }

    pub fn in_unit(self, unit: Unit) -> f64 {
        match unit {
            Unit::Celsius => self.celsius(),
            Unit::Fahrenheit => self.fahrenheit(),
        }
    }
}

/// Display unit for temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }

    pub const fn all() -> &'static [Unit] {
        &[Unit::Celsius, Unit::Fahrenheit]
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Celsius => f.write_str("celsius"),
            Unit::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    /// Short weather category, e.g. "Clouds".
    pub summary: String,
    pub temperature: Temperature,
}
