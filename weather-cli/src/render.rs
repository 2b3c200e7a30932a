use std::fmt::Write as _;

use weather_now_core::{AppState, CandidatePlace};

pub fn suggestion_line(place: &CandidatePlace) -> String {
    let region = place.region();
    if region.is_empty() { place.name.clone() } else { format!("{} ({region})", place.name) }
}

pub fn suggestions(places: &[CandidatePlace]) -> String {
    places.iter().enumerate().fold(String::new(), |mut out, (idx, place)| {
        let _ = writeln!(out, "{:>2}. {}", idx + 1, suggestion_line(place));
        out
    })
}

/// The weather card for the selected place, or just its name and the error
/// when the lookup failed.
pub fn weather_card(state: &AppState) -> String {
    let mut out = String::new();

    if let Some(place) = &state.selected {
        let _ = writeln!(out, "{}", place.full_name());
    }

    if !state.error.is_empty() {
        let _ = writeln!(out, "error: {}", state.error);
        return out;
    }

    match &state.weather {
        Some(weather) => {
            let _ = writeln!(out, "  Temperature  {}", weather.temperature);
            let _ = writeln!(out, "  Feels like   {}", weather.feels_like);
            let _ = writeln!(out, "  Humidity     {}", weather.humidity);
            let _ = writeln!(out, "  Wind         {}", weather.wind);
            let _ = writeln!(out, "  {}", weather.condition_label());
        }
        None => {
            let _ = writeln!(out, "  No current conditions reported.");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_now_core::CurrentWeather;

    fn nairobi() -> CandidatePlace {
        CandidatePlace {
            id: 184745,
            name: "Nairobi".into(),
            admin1: Some("Nairobi County".into()),
            country: Some("Kenya".into()),
            latitude: -1.28333,
            longitude: 36.81667,
        }
    }

    #[test]
    fn suggestions_are_numbered_with_region() {
        let listing = suggestions(&[nairobi()]);
        assert_eq!(listing, " 1. Nairobi (Nairobi County, Kenya)\n");
    }

    #[test]
    fn card_shows_readings_and_label() {
        let state = AppState {
            selected: Some(nairobi()),
            weather: Some(CurrentWeather {
                temperature: "24.1°C".into(),
                feels_like: "23.5°C".into(),
                humidity: "48%".into(),
                wind: "11.2km/h".into(),
                condition_code: 1,
            }),
            ..AppState::default()
        };

        let card = weather_card(&state);
        assert!(card.starts_with("Nairobi, Nairobi County, Kenya\n"));
        assert!(card.contains("Temperature  24.1°C"));
        assert!(card.contains("Mainly clear"));
    }

    #[test]
    fn card_keeps_place_name_on_error() {
        let state = AppState {
            selected: Some(nairobi()),
            error: "Failed to fetch weather".into(),
            ..AppState::default()
        };

        let card = weather_card(&state);
        assert!(card.contains("Nairobi"));
        assert!(card.contains("error: Failed to fetch weather"));
        assert!(!card.contains("Temperature"));
    }
}
