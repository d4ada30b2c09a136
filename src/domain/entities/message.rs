use super::User;
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// A command token (prefix stripped) and its trimmed argument
    Command { name: String, argument: String },
    Empty,
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: String::new(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Command { name: name.into(), argument: argument.into() })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        self.sender = user;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
