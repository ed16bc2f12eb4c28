use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client as HttpClient;
use tracing::debug;

use super::models::{ApiResponse, Update, UpdatesResponse};
use crate::error::BotError;

/// Client for the Telegram Bot API, covering the three methods the bot
/// needs: `sendMessage`, `sendPhoto` and long-polled `getUpdates`.
pub struct TelegramClient {
    http_client: HttpClient,
    token: String,
    base_url: String,
}

impl TelegramClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";

    /// Long-poll window requested from the platform.
    const POLL_TIMEOUT_SECS: u64 = 30;
    /// Client-side timeout for the poll call, slightly above the window.
    const POLL_REQUEST_TIMEOUT: Duration = Duration::from_secs(35);
    /// Bounded timeout for outbound sends.
    const SEND_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(token: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            token,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            token,
            base_url,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Send a plain text message (Markdown parse mode).
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        if text.trim().is_empty() {
            return Err(BotError::Delivery("refusing to send empty message".to_string()));
        }

        let params = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&params)
            .timeout(Self::SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        Self::check_envelope(response).await
    }

    /// Upload a PNG chart with a caption.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        png_bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), BotError> {
        if png_bytes.is_empty() {
            return Err(BotError::Delivery("refusing to send empty photo".to_string()));
        }

        let photo = Part::bytes(png_bytes)
            .file_name("chart.png")
            .mime_str("image/png")
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", photo);

        let response = self
            .http_client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .timeout(Self::SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        Self::check_envelope(response).await
    }

    /// Long-poll for inbound updates past `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        let params = serde_json::json!({
            "offset": offset,
            "timeout": Self::POLL_TIMEOUT_SECS,
            "allowed_updates": ["message"],
        });

        let response = self
            .http_client
            .post(self.method_url("getUpdates"))
            .json(&params)
            .timeout(Self::POLL_REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        let updates: UpdatesResponse = response
            .json()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        if !updates.ok {
            return Err(BotError::Delivery("getUpdates returned ok=false".to_string()));
        }

        debug!("Received {} update(s)", updates.result.len());
        Ok(updates.result)
    }

    async fn check_envelope(response: reqwest::Response) -> Result<(), BotError> {
        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;

        if !status.is_success() {
            return Err(BotError::Delivery(format!("HTTP {}: {}", status, body_text)));
        }

        let envelope: ApiResponse = serde_json::from_str(&body_text)
            .map_err(|e| BotError::Delivery(format!("unreadable API response: {}", e)))?;

        if !envelope.ok {
            return Err(BotError::Delivery(
                envelope
                    .description
                    .unwrap_or_else(|| "platform rejected the request".to_string()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{"ok": true, "result": {}}"#;

    #[tokio::test]
    async fn test_send_text_rejects_empty_payload_locally() {
        // No server: the validation must fail before any network call.
        let client = TelegramClient::with_base_url("TOKEN".to_string(), "http://127.0.0.1:1".to_string());
        let result = client.send_text(1, "   ").await;
        assert!(matches!(result, Err(BotError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_send_photo_rejects_empty_payload_locally() {
        let client = TelegramClient::with_base_url("TOKEN".to_string(), "http://127.0.0.1:1".to_string());
        let result = client.send_photo(1, Vec::new(), "caption").await;
        assert!(matches!(result, Err(BotError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_send_text_happy_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTOKEN/sendMessage")
            .with_status(200)
            .with_body(OK_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = TelegramClient::with_base_url("TOKEN".to_string(), server.url());
        client.send_text(42, "hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_envelope_is_delivery_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/botTOKEN/sendMessage")
            .with_status(403)
            .with_body(r#"{"ok": false, "description": "Forbidden: bot was blocked by the user"}"#)
            .create_async()
            .await;

        let client = TelegramClient::with_base_url("TOKEN".to_string(), server.url());
        let result = client.send_text(42, "hello").await;
        assert!(matches!(result, Err(BotError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_get_updates_parses_messages() {
        let body = r#"{
            "ok": true,
            "result": [
                {"update_id": 7, "message": {"chat": {"id": 99}, "text": "/feargreed"}}
            ]
        }"#;

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/botTOKEN/getUpdates")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = TelegramClient::with_base_url("TOKEN".to_string(), server.url());
        let updates = client.get_updates(0).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 7);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.text.as_deref(), Some("/feargreed"));
    }
}
