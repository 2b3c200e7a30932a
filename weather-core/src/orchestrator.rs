//! Search and selection orchestration.
//!
//! [`WeatherNow`] owns the [`AppState`] and is the only writer. Inputs go
//! through the debouncer into settle cycles; selections resolve weather
//! cache-first. Every async result carries a generation [`Token`] and is
//! committed only while that token is still current, so superseded searches
//! and selections never overwrite newer state.

use anyhow::Result;
use std::{
    path::Path,
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::sync::{mpsc, watch};

use crate::{
    cache::Cache,
    config::Config,
    generation::{Generation, Token},
    model::{CandidatePlace, CurrentWeather, CurrentWeatherRaw},
    provider::{LocationSearch, OpenMeteoForecast, OpenMeteoGeocoder, WeatherSource},
    scheduler::{DEBOUNCE_WINDOW, Debouncer},
    state::{Action, AppState},
    storage::FileStore,
};

/// Queries shorter than this (after trimming) clear the suggestions instead
/// of searching.
pub const MIN_QUERY_CHARS: usize = 2;

pub const GEO_NAMESPACE: &str = "geo";
pub const WEATHER_NAMESPACE: &str = "weather";

#[derive(Debug, Clone)]
pub struct WeatherNow {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    locations: Arc<dyn LocationSearch>,
    weather: Arc<dyn WeatherSource>,
    cache: Cache,
    state: watch::Sender<AppState>,
    debouncer: Debouncer,
    search_cycle: Generation,
    selection: Generation,
}

impl WeatherNow {
    /// Must be called from within a tokio runtime.
    pub fn new(
        locations: Arc<dyn LocationSearch>,
        weather: Arc<dyn WeatherSource>,
        cache: Cache,
    ) -> Self {
        Self::with_debounce_window(locations, weather, cache, DEBOUNCE_WINDOW)
    }

    pub fn with_debounce_window(
        locations: Arc<dyn LocationSearch>,
        weather: Arc<dyn WeatherSource>,
        cache: Cache,
        window: Duration,
    ) -> Self {
        let (debouncer, settled) = Debouncer::new(window);
        let (state, _) = watch::channel(AppState::default());

        let inner = Arc::new(Inner {
            locations,
            weather,
            cache,
            state,
            debouncer,
            search_cycle: Generation::new(),
            selection: Generation::new(),
        });

        tokio::spawn(settle_loop(Arc::downgrade(&inner), settled));

        Self { inner }
    }

    /// Open-Meteo clients and an on-disk cache, as described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_dir = config.resolved_cache_dir()?;
        Self::from_parts(config, &cache_dir)
    }

    fn from_parts(config: &Config, cache_dir: &Path) -> Result<Self> {
        let locations = OpenMeteoGeocoder::new(&config.geocoding_url, &config.language)?;
        let weather = OpenMeteoForecast::new(&config.forecast_url)?;
        let cache = Cache::new(Arc::new(FileStore::new(cache_dir)));

        Ok(Self::new(Arc::new(locations), Arc::new(weather), cache))
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// The user edited the search box.
    pub fn input_changed(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.commit(None, Action::InputChanged(text.clone()));
        self.inner.debouncer.push(text);
    }

    /// Set the query and run its settle cycle right away, skipping the
    /// debounce window.
    pub async fn search_now(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.debouncer.cancel();
        self.inner.commit(None, Action::InputChanged(text.clone()));

        let token = self.inner.begin_search_cycle();
        self.inner.run_search(&token, &text).await;
    }

    /// The user picked a suggestion.
    pub async fn select(&self, place: CandidatePlace) {
        self.inner.select(place).await;
    }

    /// Reset the query, suggestions, selection, weather and error in one
    /// update, and hand focus back to the search box.
    pub fn clear(&self) {
        self.inner.debouncer.cancel();
        self.inner.search_cycle.invalidate();
        self.inner.selection.invalidate();
        self.inner.commit(None, Action::Cleared);
    }
}

impl Inner {
    /// Apply `action` unless `token` has been superseded.
    fn commit(&self, token: Option<&Token>, action: Action) -> bool {
        self.state.send_if_modified(|state| {
            if let Some(token) = token.filter(|token| !token.is_current()) {
                tracing::debug!(generation = token.id(), "discarding superseded result");
                return false;
            }

            let next = state.clone().reduce(action);
            if next == *state {
                return false;
            }
            *state = next;
            true
        })
    }

    fn begin_search_cycle(&self) -> Token {
        let token = self.search_cycle.advance();
        self.commit(None, Action::SearchStarted);
        token
    }

    async fn run_search(&self, token: &Token, value: &str) {
        let query = value.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.commit(Some(token), Action::SuggestionsCleared);
            return;
        }

        let key = Cache::key(GEO_NAMESPACE, query);
        if let Some(cached) = self.cache.read::<Vec<CandidatePlace>>(&key) {
            self.commit(Some(token), Action::SuggestionsLoaded(cached));
            return;
        }

        match self.locations.search(query).await {
            Ok(places) => {
                self.cache.write(&key, &places);
                self.commit(Some(token), Action::SuggestionsLoaded(places));
            }
            Err(err) => {
                self.commit(Some(token), Action::SearchFailed(err.to_string()));
            }
        }
    }

    async fn select(&self, place: CandidatePlace) {
        // Suggestions are closed on selection; nothing pending may reopen them.
        self.debouncer.cancel();
        self.search_cycle.invalidate();

        let token = self.selection.advance();
        let (latitude, longitude) = (place.latitude, place.longitude);
        self.commit(None, Action::PlaceSelected(place));

        let key = Cache::key(WEATHER_NAMESPACE, &format!("{latitude},{longitude}"));
        let result = match self.cache.read::<CurrentWeatherRaw>(&key) {
            Some(raw) => Ok(raw),
            None => {
                let fetched = self.weather.fetch_current(latitude, longitude).await;
                if let Ok(raw) = &fetched {
                    self.cache.write(&key, raw);
                }
                fetched
            }
        };

        let action = match result {
            Ok(raw) => Action::WeatherLoaded(CurrentWeather::from_raw(&raw)),
            Err(err) => Action::WeatherFailed(err.to_string()),
        };
        self.commit(Some(&token), action);
    }
}

async fn settle_loop(inner: Weak<Inner>, mut settled: mpsc::UnboundedReceiver<String>) {
    while let Some(value) = settled.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };

        let token = inner.begin_search_cycle();
        tokio::spawn(async move {
            inner.run_search(&token, &value).await;
        });
    }
}
