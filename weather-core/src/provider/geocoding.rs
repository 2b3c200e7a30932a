use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::NetworkError, model::CandidatePlace};

use super::{LocationSearch, MAX_CANDIDATES, http_client, truncate_body};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Open-Meteo geocoding search.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    language: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<CandidatePlace>>,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            language: language.into(),
            http: http_client().context("Failed to build geocoding HTTP client")?,
        })
    }

    async fn request(&self, text: &str) -> Result<Vec<CandidatePlace>> {
        let count = MAX_CANDIDATES.to_string();

        tracing::info!(query = text, "searching locations");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("name", text),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Failed to send request to geocoding API")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).context("Failed to parse geocoding JSON")?;

        let mut places = parsed.results.unwrap_or_default();
        places.truncate(MAX_CANDIDATES);
        Ok(places)
    }
}

#[async_trait]
impl LocationSearch for OpenMeteoGeocoder {
    async fn search(&self, text: &str) -> Result<Vec<CandidatePlace>, NetworkError> {
        self.request(text).await.map_err(|err| {
            tracing::warn!(query = text, error = %format!("{err:#}"), "location search failed");
            NetworkError::Search(err)
        })
    }
}
