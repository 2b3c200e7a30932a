use std::fmt;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weather_now_core::{CandidatePlace, Config, WeatherNow};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-now", version, about = "Current weather by city name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List places matching a name.
    Search {
        /// City name, at least two characters.
        name: String,
    },

    /// Show current weather for a place.
    Show {
        /// City name, at least two characters.
        name: String,

        /// Take the first match instead of prompting.
        #[arg(long)]
        first: bool,
    },

    /// Interactively edit language and API endpoints.
    Configure,

    /// Print the config file location.
    ConfigPath,
}

/// Wrapper so `inquire` can list candidates.
struct PlaceOption(CandidatePlace);

impl fmt::Display for PlaceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::suggestion_line(&self.0))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Search { name } => {
                let app = build_app()?;
                app.search_now(name).await;

                let state = app.snapshot();
                if !state.error.is_empty() {
                    bail!(state.error);
                }
                if state.suggestions.is_empty() {
                    println!("No places found.");
                } else {
                    print!("{}", render::suggestions(&state.suggestions));
                }
            }
            Command::Show { name, first } => {
                let app = build_app()?;
                app.search_now(name.as_str()).await;

                let state = app.snapshot();
                if !state.error.is_empty() {
                    bail!(state.error);
                }

                let place = pick_place(state.suggestions, first)
                    .with_context(|| format!("No place selected for '{name}'"))?;

                app.select(place).await;
                let state = app.snapshot();
                print!("{}", render::weather_card(&state));

                if !state.error.is_empty() {
                    std::process::exit(1);
                }
            }
            Command::Configure => {
                let mut config = Config::load()?;

                config.language =
                    Text::new("Language code:").with_default(&config.language).prompt()?;
                config.geocoding_url = Text::new("Geocoding API URL:")
                    .with_default(&config.geocoding_url)
                    .prompt()?;
                config.forecast_url =
                    Text::new("Weather API URL:").with_default(&config.forecast_url).prompt()?;

                config.save()?;
                println!("Saved {}", Config::config_file_path()?.display());
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn build_app() -> anyhow::Result<WeatherNow> {
    let config = Config::load().context(
        "Failed to load configuration.\n\
         Hint: run `weather-now configure` to rewrite it.",
    )?;
    tracing::debug!(?config, "loaded configuration");

    WeatherNow::from_config(&config)
}

fn pick_place(mut places: Vec<CandidatePlace>, first: bool) -> anyhow::Result<CandidatePlace> {
    if places.is_empty() {
        bail!("No places found.");
    }
    if first || places.len() == 1 {
        return Ok(places.swap_remove(0));
    }

    let options = places.into_iter().map(PlaceOption).collect();
    let PlaceOption(place) = Select::new("Select a place:", options).prompt()?;
    Ok(place)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: i64, name: &str) -> CandidatePlace {
        CandidatePlace {
            id,
            name: name.into(),
            admin1: None,
            country: Some("India".into()),
            latitude: 19.07283,
            longitude: 72.88261,
        }
    }

    #[test]
    fn cli_parses_show_with_first() {
        let cli = Cli::try_parse_from(["weather-now", "show", "Mumbai", "--first"]).unwrap();

        match cli.command {
            Command::Show { name, first } => {
                assert_eq!(name, "Mumbai");
                assert!(first);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pick_place_errors_when_empty() {
        let err = pick_place(Vec::new(), true).unwrap_err();
        assert!(err.to_string().contains("No places found"));
    }

    #[test]
    fn pick_place_takes_first_without_prompt() {
        let picked = pick_place(vec![place(1, "Mumbai"), place(2, "Mumbra")], true).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn pick_place_single_match_skips_prompt() {
        let picked = pick_place(vec![place(7, "Mumbai")], false).unwrap();
        assert_eq!(picked.id, 7);
    }

    #[test]
    fn place_option_displays_region() {
        assert_eq!(PlaceOption(place(1, "Mumbai")).to_string(), "Mumbai (India)");
    }
}
