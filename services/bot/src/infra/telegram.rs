use anyhow::{Context as _, anyhow};
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

use crate::domain::repository::Messenger;
use crate::domain::types::Keyboard;
use crate::error::BotServiceError;

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// `<api root>/bot<token>`
    base_url: String,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    chat_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<i64>,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a Keyboard>,
    disable_web_page_preview: bool,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    async fn call<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            .with_context(|| format!("telegram {method}: send"))?;
        let status = resp.status();
        let payload: serde_json::Value = resp.json().await.unwrap_or_default();
        if !status.is_success() || payload["ok"] == false {
            return Err(anyhow!(
                "telegram {method}: status {status}, description {}",
                payload["description"]
            ));
        }
        Ok(())
    }

    /// Register `url` as the webhook; Telegram echoes `secret` on every delivery.
    pub async fn set_webhook(&self, url: &str, secret: &str) -> anyhow::Result<()> {
        self.call(
            "setWebhook",
            &json!({
                "url": url,
                "secret_token": secret,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }
}

impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BotServiceError> {
        let body = MessageBody {
            chat_id,
            message_id: None,
            text,
            reply_markup: keyboard,
            disable_web_page_preview: true,
        };
        Ok(self.call("sendMessage", &body).await?)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BotServiceError> {
        let body = MessageBody {
            chat_id,
            message_id: Some(message_id),
            text,
            reply_markup: keyboard,
            disable_web_page_preview: true,
        };
        Ok(self.call("editMessageText", &body).await?)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotServiceError> {
        Ok(self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_id }),
            )
            .await?)
    }
}
