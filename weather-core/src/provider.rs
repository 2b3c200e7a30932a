use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::{
    error::NetworkError,
    model::{CandidatePlace, CurrentWeatherRaw},
};

pub mod forecast;
pub mod geocoding;

pub use forecast::OpenMeteoForecast;
pub use geocoding::OpenMeteoGeocoder;

/// Maximum number of candidates requested from the geocoder.
pub const MAX_CANDIDATES: usize = 5;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("weather-now/", env!("CARGO_PKG_VERSION"));

/// Free-text place lookup.
#[async_trait]
pub trait LocationSearch: Send + Sync + Debug {
    async fn search(&self, text: &str) -> Result<Vec<CandidatePlace>, NetworkError>;
}

/// Current conditions at a coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeatherRaw, NetworkError>;
}

fn http_client() -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;

    Ok(client)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("bad request"), "bad request");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "°".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
