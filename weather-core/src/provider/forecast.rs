use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::{error::NetworkError, model::CurrentWeatherRaw};

use super::{WeatherSource, http_client, truncate_body};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Variables requested in the `current` block.
pub const CURRENT_VARIABLES: [&str; 5] = [
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "wind_speed_10m",
    "weather_code",
];

/// Open-Meteo current conditions.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            http: http_client().context("Failed to build forecast HTTP client")?,
        })
    }

    async fn request(&self, latitude: f64, longitude: f64) -> Result<CurrentWeatherRaw> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let current = CURRENT_VARIABLES.join(",");

        tracing::info!(%latitude, %longitude, "fetching current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", current.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to weather API")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read weather response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse weather JSON")
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoForecast {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeatherRaw, NetworkError> {
        self.request(latitude, longitude).await.map_err(|err| {
            tracing::warn!(latitude, longitude, error = %format!("{err:#}"), "weather fetch failed");
            NetworkError::Weather(err)
        })
    }
}
