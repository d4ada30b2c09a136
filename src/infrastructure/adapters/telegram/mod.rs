//! Telegram adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ParseMode, Reply};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;
use crate::infrastructure::config::DEFAULT_API_URL;

/// Bot API description for text the formatter could not parse
const PARSE_ENTITIES_ERROR: &str = "can't parse entities";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
}

impl Message {
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.date, 0).unwrap_or_default()
    }

    pub fn sender(&self) -> Option<crate::domain::entities::User> {
        self.from.as_ref().map(|u| {
            let mut user = crate::domain::entities::User::new(u.id.to_string());
            if let Some(first) = &u.first_name {
                user = user.with_name(first, u.last_name.as_ref());
            }
            if let Some(username) = &u.username {
                user = user.with_username(username);
            }
            user.is_bot = u.is_bot;
            user
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_URL.to_string(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "b64-bot".to_string(),
                username: "b64_bot".to_string(),
            },
        }
    }

    /// Point the adapter at another Bot API server
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// POST `request` to `method` and unwrap the Bot API envelope
    async fn call<Req, T>(&self, method: &str, request: &Req) -> Result<T, BotError>
    where
        Req: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                return Err(BotError::Network(format!("Telegram API error: {}", status)));
            }
            Err(e) => return Err(BotError::Parse(format!("{}: {}", method, e))),
        };

        if !data.ok {
            let description = data.description.unwrap_or_else(|| status.to_string());
            return Err(BotError::Api(format!("{}: {}", method, description)));
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{}: response has no result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset, keeping `current` when there is nothing newer
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .map_or(current, |next| next.max(current))
    }

    /// Send a reply, falling back to plain text when Telegram rejects the formatting.
    ///
    /// Other API errors (blocked bot, flood limits) are returned as-is.
    pub async fn send_message_api(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        let Some(mode) = reply.parse_mode else {
            return self.send_message_with_format(chat_id, &reply.text, None).await;
        };

        match self.send_message_with_format(chat_id, &reply.text, Some(mode)).await {
            Ok(result) => Ok(result),
            Err(BotError::Api(e)) if e.contains(PARSE_ENTITIES_ERROR) => {
                tracing::warn!("{} failed, using plain text: {}", mode.as_str(), e);
                self.send_message_with_format(chat_id, &reply.text, None).await
            }
            Err(e) => Err(e),
        }
    }

    /// Send a message with specific parse mode
    pub async fn send_message_with_format(&self, chat_id: &str, text: &str, parse_mode: Option<ParseMode>) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'static str>,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: parse_mode.map(|m| m.as_str()),
        };

        let data: MessageResult = self.call("sendMessage", &request).await?;
        Ok(data.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|(command, description)| Command { command, description })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request).await?;

        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        let shown: String = self.token.chars().take(8).collect();
        tracing::info!("Starting Telegram bot @{} (token: {}...)", self.info.username, shown);
        Ok(())
    }

    async fn send_reply(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, reply.text);
        self.send_message_api(chat_id, reply).await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
