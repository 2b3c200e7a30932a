use serde::{Deserialize, Serialize};

use crate::condition;

/// One geocoding match.
///
/// The serde layout is the geocoding API's, so cached suggestion lists keep
/// the shape of the original response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePlace {
    pub id: i64,
    pub name: String,
    pub admin1: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CandidatePlace {
    /// Text written back into the search box when this place is chosen.
    pub fn label(&self) -> String {
        match self.admin1.as_deref().or(self.country.as_deref()) {
            Some(region) if !region.is_empty() => format!("{}, {}", self.name, region),
            _ => self.name.clone(),
        }
    }

    /// Region line shown under the name in a suggestion list.
    pub fn region(&self) -> String {
        [self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn full_name(&self) -> String {
        let region = self.region();
        if region.is_empty() { self.name.clone() } else { format!("{}, {}", self.name, region) }
    }

    /// Identity of this entry within a rendered list.
    pub fn list_key(&self) -> String {
        format!("{}-{}-{}", self.id, self.latitude, self.longitude)
    }
}

/// Current-conditions response as returned by the weather API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherRaw {
    #[serde(default)]
    pub current: Option<CurrentReadings>,
    #[serde(default)]
    pub current_units: CurrentUnits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReadings {
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub relative_humidity_2m: f64,
    pub wind_speed_10m: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUnits {
    pub temperature_2m: Option<String>,
    pub apparent_temperature: Option<String>,
    pub relative_humidity_2m: Option<String>,
    pub wind_speed_10m: Option<String>,
}

/// Display-ready current conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentWeather {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub condition_code: i32,
}

impl CurrentWeather {
    /// `None` when the response carried no `current` block.
    pub fn from_raw(raw: &CurrentWeatherRaw) -> Option<Self> {
        let readings = raw.current.as_ref()?;
        let units = &raw.current_units;

        Some(Self {
            temperature: with_unit(readings.temperature_2m, units.temperature_2m.as_deref(), "°C"),
            feels_like: with_unit(
                readings.apparent_temperature,
                units.apparent_temperature.as_deref(),
                "°C",
            ),
            humidity: with_unit(
                readings.relative_humidity_2m,
                units.relative_humidity_2m.as_deref(),
                "%",
            ),
            wind: with_unit(readings.wind_speed_10m, units.wind_speed_10m.as_deref(), " km/h"),
            condition_code: readings.weather_code,
        })
    }

    pub fn condition_label(&self) -> &'static str {
        condition::label(self.condition_code)
    }
}

fn with_unit(value: f64, unit: Option<&str>, fallback: &str) -> String {
    let unit = unit.filter(|u| !u.is_empty()).unwrap_or(fallback);
    format!("{value}{unit}")
}
