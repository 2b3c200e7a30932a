//! WMO weather interpretation codes.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Shown for codes outside the table.
pub const UNKNOWN_CONDITION: &str = "—";

pub fn describe(code: i32) -> Option<&'static str> {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: Light",
        53 => "Drizzle: Moderate",
        55 => "Drizzle: Dense",
        56 => "Freezing Drizzle: Light",
        57 => "Freezing Drizzle: Dense",
        61 => "Rain: Slight",
        63 => "Rain: Moderate",
        65 => "Rain: Heavy",
        66 => "Freezing Rain: Light",
        67 => "Freezing Rain: Heavy",
        71 => "Snow fall: Slight",
        73 => "Snow fall: Moderate",
        75 => "Snow fall: Heavy",
        77 => "Snow grains",
        80 => "Rain showers: Slight",
        81 => "Rain showers: Moderate",
        82 => "Rain showers: Violent",
        85 => "Snow showers: Slight",
        86 => "Snow showers: Heavy",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return None,
    };

    Some(text)
}

pub fn label(code: i32) -> &'static str {
    describe(code).unwrap_or(UNKNOWN_CONDITION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(label(0), "Clear sky");
        assert_eq!(label(45), "Fog");
        assert_eq!(label(66), "Freezing Rain: Light");
        assert_eq!(label(82), "Rain showers: Violent");
        assert_eq!(label(99), "Thunderstorm with heavy hail");
    }

    #[test]
    fn unknown_codes_use_placeholder() {
        assert_eq!(label(4), UNKNOWN_CONDITION);
        assert_eq!(label(-1), UNKNOWN_CONDITION);
        assert_eq!(label(1000), UNKNOWN_CONDITION);
        assert_eq!(describe(100), None);
    }

    #[test]
    fn table_covers_every_group() {
        let known = (0..100).filter(|code| describe(*code).is_some()).count();
        assert_eq!(known, 28);
    }
}
