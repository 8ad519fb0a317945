//! Maps provider weather categories into the closed vocabulary used for
//! outfit matching, plus a display icon.

use serde::{Deserialize, Serialize};

/// Normalized four-value weather bucket used for matching. Distinct from the
/// raw provider label, which is only carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCode {
    Clear,
    Clouds,
    Rain,
    Snow,
}

impl ConditionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCode::Clear => "clear",
            ConditionCode::Clouds => "clouds",
            ConditionCode::Rain => "rain",
            ConditionCode::Snow => "snow",
        }
    }

    /// Parse a stored code; anything unrecognized counts as unset.
    pub fn parse(value: Option<&str>) -> Option<ConditionCode> {
        match value {
            Some("clear") => Some(ConditionCode::Clear),
            Some("clouds") => Some(ConditionCode::Clouds),
            Some("rain") => Some(ConditionCode::Rain),
            Some("snow") => Some(ConditionCode::Snow),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fallback for provider categories not in the table.
const DEFAULT: (ConditionCode, &str) = (ConditionCode::Clear, "🌤️");

/// Normalize a provider category (e.g. "Thunderstorm") into a condition code
/// and display icon. Total over all strings; unknown inputs get the default
/// pair.
pub fn normalize(raw: &str) -> (ConditionCode, &'static str) {
    match raw {
        "Clear" => (ConditionCode::Clear, "☀️"),
        "Clouds" => (ConditionCode::Clouds, "☁️"),
        "Rain" => (ConditionCode::Rain, "🌧️"),
        "Drizzle" => (ConditionCode::Rain, "🌦️"),
        "Thunderstorm" => (ConditionCode::Rain, "⛈️"),
        "Snow" => (ConditionCode::Snow, "❄️"),
        "Mist" | "Fog" | "Haze" => (ConditionCode::Clouds, "🌫️"),
        _ => DEFAULT,
    }
}
