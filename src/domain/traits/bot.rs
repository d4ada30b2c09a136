use async_trait::async_trait;
use crate::domain::entities::Reply;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Prepare the adapter before the update loop starts
    async fn start(&self) -> Result<(), BotError>;

    /// Send a reply to a chat, returning the platform message id
    async fn send_reply(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError>;

    /// Send a plain-text message to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        self.send_reply(chat_id, &Reply::plain(text)).await
    }

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
