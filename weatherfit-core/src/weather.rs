use async_trait::async_trait;
use std::fmt::Debug;

use crate::condition;
use crate::model::WeatherReading;

pub mod openweather;

/// Raw current-conditions response from a weather provider, metric units.
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    /// Provider category, e.g. "Clear", "Thunderstorm".
    pub condition_label: String,
    /// Localized description, e.g. "튼구름".
    pub description: String,
}

impl CurrentWeather {
    /// Round and normalize into the snapshot used for matching and display.
    pub fn into_reading(self) -> WeatherReading {
        let (code, icon) = condition::normalize(&self.condition_label);
        WeatherReading {
            temperature: self.temperature_c.round() as i32,
            feels_like: self.feels_like_c.round() as i32,
            humidity: self.humidity_pct,
            condition_label: self.condition_label,
            description: self.description,
            code,
            icon: icon.to_string(),
        }
    }
}

/// Current-weather lookup by coordinates.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn current(&self, latitude: f64, longitude: f64) -> anyhow::Result<CurrentWeather>;
}
