use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::MessageDelivery;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// The Bot API answered but rejected the request.
#[derive(Debug, Error)]
#[error("Telegram API rejected {method}: {description}")]
pub struct TelegramApiError {
    pub method: &'static str,
    pub description: String,
}

/// Telegram Bot API delivery channel. All messages use HTML parse mode.
#[derive(Debug, Clone)]
pub struct TelegramDelivery {
    bot_token: String,
    api_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramDelivery {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_url(bot_token, DEFAULT_API_URL.to_string())
    }

    /// Point the client at a different endpoint, used by tests.
    pub fn with_api_url(bot_token: String, api_url: String) -> Self {
        Self {
            bot_token,
            api_url,
            http: Client::new(),
        }
    }

    async fn call(&self, method: &'static str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}/bot{}/{}", self.api_url, self.bot_token, method);

        let res = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send Telegram {method} request"))?;

        let parsed: ApiResponse = res
            .json()
            .await
            .with_context(|| format!("Failed to parse Telegram {method} response"))?;

        if !parsed.ok {
            return Err(TelegramApiError {
                method,
                description: parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }
            .into());
        }

        Ok(())
    }
}

#[async_trait]
impl MessageDelivery for TelegramDelivery {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<()> {
        self.call(
            "sendMessage",
            json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
            }),
        )
        .await
    }

    async fn send_image(&self, chat_id: &str, image_url: &str, caption: &str) -> Result<()> {
        self.call(
            "sendPhoto",
            json!({
                "chat_id": chat_id,
                "photo": image_url,
                "caption": caption,
                "parse_mode": "HTML",
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn send_text_posts_html_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "99",
                "text": "안녕하세요",
                "parse_mode": "HTML",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let delivery = TelegramDelivery::with_api_url("TOKEN".to_string(), server.uri());
        delivery.send_text("99", "안녕하세요").await.unwrap();
    }

    #[tokio::test]
    async fn send_image_posts_photo_with_caption() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendPhoto"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "99",
                "photo": "https://cdn.example/clothes/padding.jpg",
                "caption": "외투: 패딩",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let delivery = TelegramDelivery::with_api_url("TOKEN".to_string(), server.uri());
        delivery
            .send_image("99", "https://cdn.example/clothes/padding.jpg", "외투: 패딩")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_rejection_surfaces_the_description() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let delivery = TelegramDelivery::with_api_url("TOKEN".to_string(), server.uri());
        let err = delivery.send_text("0", "hi").await.unwrap_err();

        assert!(err.to_string().contains("chat not found"));
        assert!(err.downcast_ref::<TelegramApiError>().is_some());
    }
}
