use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use super::types::{render_text, ApiResponse, ReplyKeyboardMarkup, SendMessageRequest, Update};
use crate::error::TransportError;
use crate::outbound::OutboundMessage;
use crate::transport::{ChatTransport, InboundUpdate};

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
    bot_token: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(api_base: String, bot_token: String, poll_timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token,
            poll_timeout_secs,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    /// Long-poll for message updates starting at `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        let response = self
            .client
            .post(self.method_url("getUpdates"))
            // Leave the server room to answer before our own timeout fires.
            .timeout(Duration::from_secs(self.poll_timeout_secs + 10))
            .json(&json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message"],
            }))
            .send()
            .await?;

        Self::unwrap_response(response).await
    }

    /// Send one text message, optionally into a forum topic and with a reply keyboard
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: String,
        thread_id: Option<i64>,
        reply_markup: Option<ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let payload = SendMessageRequest {
            chat_id,
            text,
            message_thread_id: thread_id,
            reply_markup,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await?;

        let _: serde_json::Value = Self::unwrap_response(response).await?;
        Ok(())
    }

    async fn unwrap_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
        let body = response.text().await?;
        let parsed: ApiResponse<T> = serde_json::from_str(&body)?;

        if !parsed.ok {
            return Err(TransportError::Api(
                parsed.description.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        parsed
            .result
            .ok_or_else(|| TransportError::Api("missing result".to_string()))
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn fetch_updates(&self, offset: i64) -> Result<Vec<InboundUpdate>, TransportError> {
        let updates = self.get_updates(offset).await?;
        Ok(updates.into_iter().map(Into::into).collect())
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.send_message(
            message.chat_id,
            render_text(&message.title, &message.body),
            message.thread_id,
            ReplyKeyboardMarkup::for_keyboard(&message.keyboard),
        )
        .await
    }
}
