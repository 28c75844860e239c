use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use log::debug;
use weather_core::{
    Conditions, Config, Unit, WeatherProvider,
    config::API_KEY_ENV,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Show current weather conditions",
    after_help = "Example: weather London,UK",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Location name, optionally with a country code, e.g. "Paris,FR".
    #[arg(required = true)]
    pub location: Option<String>,

    /// Display the temperature in Fahrenheit instead of Celsius.
    #[arg(short, long)]
    pub fahrenheit: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and preferred unit in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(Command::Configure) = self.command {
            return configure();
        }

        // clap enforces a location whenever no subcommand is given.
        let location = self.location.context("No location given")?;

        let config = Config::load()?;
        let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;
        let client = config.client(&api_key)?;

        let unit = if self.fahrenheit { Unit::Fahrenheit } else { config.unit() };
        let line = show(&client, &location, unit).await?;
        println!("{line}");

        Ok(())
    }
}

/// Query `provider` and render the result for display.
pub async fn show(
    provider: &dyn WeatherProvider,
    location: &str,
    unit: Unit,
) -> anyhow::Result<String> {
    let conditions = provider.get_weather(location).await?;
    debug!("Conditions for {location:?}: {conditions:?}");
    Ok(format_conditions(&conditions, unit))
}

pub fn format_conditions(conditions: &Conditions, unit: Unit) -> String {
    format!(
        "{} {:.1}º{}",
        conditions.summary,
        conditions.temperature.in_unit(unit),
        unit.symbol()
    )
}

/// Flatten an error chain into one line, skipping causes whose text the
/// outer message already contains.
pub fn render_error(err: &anyhow::Error) -> String {
    let mut line = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if line.contains(&text) {
            continue;
        }
        if !line.is_empty() {
            line.push_str(": ");
        }
        line.push_str(&text);
    }
    line
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let unit = Select::new("Default temperature unit:", Unit::all().to_vec())
        .with_starting_cursor(Unit::all().iter().position(|u| *u == config.unit()).unwrap_or(0))
        .prompt()
        .context("Failed to read temperature unit")?;

    config.api_key = Some(api_key.trim().to_string());
    config.unit = Some(unit);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
