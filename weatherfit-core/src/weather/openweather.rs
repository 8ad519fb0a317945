use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{CurrentWeather, WeatherLookup};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather current-conditions client. Descriptions are requested in
/// Korean to match the notification copy.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint, used by tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", latitude.to_string().as_str()),
                ("lon", longitude.to_string().as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "kr"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let (label, description) = parsed
            .weather
            .first()
            .map(|w| (w.main.clone(), w.description.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));

        Ok(CurrentWeather {
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            condition_label: label,
            description,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn parses_a_current_weather_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "kr"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 11.7, "feels_like": 9.9, "humidity": 68 },
                "weather": [ { "main": "Clouds", "description": "튼구름" } ]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
        let current = client.current(37.5665, 126.978).await.unwrap();

        assert_eq!(current.temperature_c, 11.7);
        assert_eq!(current.feels_like_c, 9.9);
        assert_eq!(current.humidity_pct, 68);
        assert_eq!(current.condition_label, "Clouds");
        assert_eq!(current.description, "튼구름");
    }

    #[tokio::test]
    async fn non_success_status_becomes_an_error_with_the_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("BAD".to_string(), server.uri());
        let err = client.current(37.5665, 126.978).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn empty_weather_array_falls_back_to_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 3.0, "feels_like": 1.0, "humidity": 40 },
                "weather": []
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
        let current = client.current(35.1796, 129.0756).await.unwrap();

        assert_eq!(current.condition_label, "Unknown");
    }
}
