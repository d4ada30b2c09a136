//! Message dispatcher - Routes messages to command handlers

use crate::domain::entities::{Content, Message, Reply, User};
use crate::application::errors::{BotError, CommandError};
use crate::application::services::CommandService;
use super::parser::MessageParser;

/// Message dispatcher - parses text and routes commands to handlers
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(commands: CommandService) -> Self {
        Self {
            parser: MessageParser::new(commands.prefix()),
            commands,
        }
    }

    /// Only strip `@username` mentions that address this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.parser = self.parser.with_bot_username(username);
        self
    }

    /// Parse raw text into a message
    pub fn parse(&self, chat_id: impl Into<String>, text: &str, sender: Option<User>) -> Message {
        self.parser.parse(chat_id, text, sender)
    }

    /// Process a raw text message
    pub fn process_text(&self, chat_id: impl Into<String>, text: &str) -> Result<Option<Reply>, BotError> {
        let message = self.parse(chat_id, text, None);
        self.process(&message)
    }

    /// Process a message, returning the reply to send if any
    pub fn process(&self, message: &Message) -> Result<Option<Reply>, BotError> {
        match &message.content {
            Content::Command { name, .. } => match self.commands.handle(message) {
                Ok(reply) => Ok(reply),
                Err(CommandError::NotFound(_)) => {
                    tracing::debug!("[{}] Ignoring unknown command /{}", message.chat_id, name);
                    Ok(None)
                }
                Err(e) => Err(BotError::Command(e)),
            },
            Content::Text(text) => {
                let preview: String = text.chars().take(50).collect();
                tracing::debug!("[{}] Ignoring non-command text: {}", message.chat_id, preview);
                Ok(None)
            }
            Content::Empty => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::command_service::ENCODE_USAGE;

    fn dispatcher() -> MessageDispatcher {
        let mut commands = CommandService::new("/");
        commands.register_defaults();
        MessageDispatcher::new(commands).with_bot_username("b64_bot")
    }

    #[test]
    fn routes_commands() {
        let reply = dispatcher().process_text("1", "/base64_enc hi").unwrap().unwrap();
        assert_eq!(reply.text, "```\naGk=\n```");
    }

    #[test]
    fn routes_addressed_commands() {
        let reply = dispatcher().process_text("-100", "/base64_enc@b64_bot").unwrap().unwrap();
        assert_eq!(reply.text, ENCODE_USAGE);
    }

    #[test]
    fn ignores_unknown_commands_and_text() {
        let d = dispatcher();
        assert!(d.process_text("1", "/start").unwrap().is_none());
        assert!(d.process_text("1", "hello there").unwrap().is_none());
        assert!(d.process_text("1", "").unwrap().is_none());
    }

    #[test]
    fn command_token_must_end_at_whitespace() {
        assert!(dispatcher().process_text("1", "/base64_encode hi").unwrap().is_none());
    }
}
