//! Core library for the `weather-now` CLI.
//!
//! This crate defines:
//! - Geocoding and current-weather clients for Open-Meteo
//! - A time-boxed local cache over pluggable storage
//! - Debounced search scheduling and selection orchestration
//! - The presentation-facing application state
//!
//! It is used by `weather-now-cli`, but any front end can drive
//! [`WeatherNow`] and subscribe to its [`AppState`].

pub mod cache;
pub mod condition;
pub mod config;
pub mod error;
pub mod generation;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod scheduler;
pub mod state;
pub mod storage;

pub use cache::{Cache, CacheEntry, Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{NetworkError, StorageError};
pub use model::{CandidatePlace, CurrentWeather, CurrentWeatherRaw};
pub use orchestrator::WeatherNow;
pub use provider::{LocationSearch, OpenMeteoForecast, OpenMeteoGeocoder, WeatherSource};
pub use state::{AppState, InputFocus, ViewStatus};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
