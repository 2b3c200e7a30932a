//! Presentation-facing state and its transitions.
//!
//! `AppState` is only ever replaced through [`AppState::reduce`]; the
//! orchestrator publishes every new value to subscribers.

use crate::model::{CandidatePlace, CurrentWeather};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFocus {
    #[default]
    Search,
    Blurred,
}

/// Coarse status derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Error,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub query: String,
    pub suggestions: Vec<CandidatePlace>,
    pub loading: bool,
    /// Empty when there is nothing to report.
    pub error: String,
    pub selected: Option<CandidatePlace>,
    pub weather: Option<CurrentWeather>,
    pub focus: InputFocus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InputChanged(String),
    /// A settle cycle began.
    SearchStarted,
    SuggestionsCleared,
    SuggestionsLoaded(Vec<CandidatePlace>),
    SearchFailed(String),
    PlaceSelected(CandidatePlace),
    WeatherLoaded(Option<CurrentWeather>),
    WeatherFailed(String),
    Cleared,
}

impl AppState {
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::InputChanged(query) => Self { query, ..self },
            Action::SearchStarted => Self { error: String::new(), ..self },
            Action::SuggestionsCleared => Self { suggestions: Vec::new(), ..self },
            Action::SuggestionsLoaded(suggestions) => Self { suggestions, ..self },
            Action::SearchFailed(error) => Self { error, ..self },
            Action::PlaceSelected(place) => Self {
                query: place.label(),
                suggestions: Vec::new(),
                loading: true,
                error: String::new(),
                selected: Some(place),
                weather: None,
                focus: InputFocus::Blurred,
            },
            Action::WeatherLoaded(weather) => Self { weather, loading: false, ..self },
            Action::WeatherFailed(error) => Self { error, weather: None, loading: false, ..self },
            Action::Cleared => Self::default(),
        }
    }

    pub fn status(&self) -> ViewStatus {
        if self.loading {
            ViewStatus::Loading
        } else if !self.error.is_empty() {
            ViewStatus::Error
        } else if self.weather.is_some() {
            ViewStatus::Ready
        } else {
            ViewStatus::Idle
        }
    }

    pub fn condition_label(&self) -> Option<&'static str> {
        self.weather.as_ref().map(CurrentWeather::condition_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> CandidatePlace {
        CandidatePlace {
            id: 2988507,
            name: "Paris".into(),
            admin1: Some("Île-de-France".into()),
            country: Some("France".into()),
            latitude: 48.85341,
            longitude: 2.3488,
        }
    }

    fn sunny() -> CurrentWeather {
        CurrentWeather {
            temperature: "21°C".into(),
            feels_like: "20°C".into(),
            humidity: "40%".into(),
            wind: "8 km/h".into(),
            condition_code: 0,
        }
    }

    #[test]
    fn selection_resets_weather_and_error_and_starts_loading() {
        let state = AppState {
            query: "par".into(),
            suggestions: vec![paris()],
            error: "Failed to search location".into(),
            weather: Some(sunny()),
            ..AppState::default()
        }
        .reduce(Action::PlaceSelected(paris()));

        assert_eq!(state.query, "Paris, Île-de-France");
        assert!(state.suggestions.is_empty());
        assert!(state.loading);
        assert!(state.error.is_empty());
        assert_eq!(state.weather, None);
        assert_eq!(state.focus, InputFocus::Blurred);
        assert_eq!(state.status(), ViewStatus::Loading);
    }

    #[test]
    fn weather_failure_keeps_selected_place() {
        let state = AppState::default()
            .reduce(Action::PlaceSelected(paris()))
            .reduce(Action::WeatherFailed("Failed to fetch weather".into()));

        assert_eq!(state.selected, Some(paris()));
        assert_eq!(state.weather, None);
        assert!(!state.loading);
        assert_eq!(state.status(), ViewStatus::Error);
    }

    #[test]
    fn search_failure_keeps_prior_weather() {
        let state = AppState::default()
            .reduce(Action::PlaceSelected(paris()))
            .reduce(Action::WeatherLoaded(Some(sunny())))
            .reduce(Action::InputChanged("zz".into()))
            .reduce(Action::SearchStarted)
            .reduce(Action::SearchFailed("Failed to search location".into()));

        assert_eq!(state.weather, Some(sunny()));
        assert_eq!(state.selected, Some(paris()));
        assert_eq!(state.status(), ViewStatus::Error);
    }

    #[test]
    fn search_started_clears_error_only() {
        let state = AppState {
            error: "boom".into(),
            suggestions: vec![paris()],
            ..AppState::default()
        }
        .reduce(Action::SearchStarted);

        assert!(state.error.is_empty());
        assert_eq!(state.suggestions, vec![paris()]);
    }

    #[test]
    fn cleared_resets_everything() {
        let state = AppState::default()
            .reduce(Action::PlaceSelected(paris()))
            .reduce(Action::WeatherLoaded(Some(sunny())))
            .reduce(Action::Cleared);

        assert_eq!(state, AppState::default());
        assert_eq!(state.focus, InputFocus::Search);
        assert_eq!(state.status(), ViewStatus::Idle);
    }

    #[test]
    fn ready_exposes_condition_label() {
        let state = AppState::default()
            .reduce(Action::PlaceSelected(paris()))
            .reduce(Action::WeatherLoaded(Some(sunny())));

        assert_eq!(state.status(), ViewStatus::Ready);
        assert_eq!(state.condition_label(), Some("Clear sky"));
    }
}
