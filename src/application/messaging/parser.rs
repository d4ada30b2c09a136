//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Content, Message, User};

/// Everything after the first space, trimmed.
///
/// Only a space separates the argument: `/cmd\nfoo` has no argument.
/// Returns an empty string when there is no such remainder.
pub fn extract_argument(text: &str) -> String {
    match text.split_once(' ') {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    }
}

/// Parses incoming text into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Strip `@username` suffixes addressed to this bot from command tokens
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: &str, sender: Option<User>) -> Message {
        let content = if text.trim().is_empty() {
            Content::Empty
        } else if !self.command_prefix.is_empty() && text.starts_with(&self.command_prefix) {
            self.parse_command(text)
        } else {
            Content::Text(text.to_string())
        };

        Message::new(chat_id, content).with_sender_opt(sender)
    }

    fn parse_command(&self, text: &str) -> Content {
        // The name ends at any whitespace so `/cmd\nfoo` still names `cmd`
        let token = text
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default();
        let token = token.strip_prefix(self.command_prefix.as_str()).unwrap_or(token);

        // "/help@my_bot" is how Telegram addresses commands in groups
        let name = match (token.split_once('@'), &self.bot_username) {
            (Some((name, target)), Some(username)) if target.eq_ignore_ascii_case(username) => name,
            (Some((name, _)), None) => name,
            _ => token,
        };

        Content::Command {
            name: name.to_lowercase(),
            argument: extract_argument(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(content: &Content) -> (&str, &str) {
        match content {
            Content::Command { name, argument } => (name.as_str(), argument.as_str()),
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn argument_is_trimmed_remainder() {
        assert_eq!(extract_argument("/base64_enc hello world"), "hello world");
        assert_eq!(extract_argument("/base64_enc    padded   "), "padded");
        assert_eq!(extract_argument("/base64_enc line one\nline two"), "line one\nline two");
    }

    #[test]
    fn argument_splits_on_space_only() {
        assert_eq!(extract_argument("/base64_enc\nhello"), "");
        assert_eq!(extract_argument("/base64_enc\thello"), "");
        assert_eq!(extract_argument("/base64_enc\nhello world"), "world");
    }

    #[test]
    fn command_name_ends_at_newline() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/base64_enc\nhello world", None);
        assert_eq!(command(&msg.content), ("base64_enc", "world"));
    }

    #[test]
    fn argument_empty_without_remainder() {
        assert_eq!(extract_argument("/base64_enc"), "");
        assert_eq!(extract_argument("/base64_enc   "), "");
        assert_eq!(extract_argument(""), "");
    }

    #[test]
    fn parses_command_with_argument() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/base64_dec aGVsbG8=", None);
        assert_eq!(msg.chat_id, "1");
        assert_eq!(command(&msg.content), ("base64_dec", "aGVsbG8="));
    }

    #[test]
    fn command_name_is_lowercased() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/HELP", None);
        assert_eq!(command(&msg.content), ("help", ""));
    }

    #[test]
    fn strips_own_mention_only() {
        let parser = MessageParser::new("/").with_bot_username("b64_bot");

        let own = parser.parse("1", "/base64_enc@B64_Bot hi", None);
        assert_eq!(command(&own.content), ("base64_enc", "hi"));

        let other = parser.parse("1", "/base64_enc@other_bot hi", None);
        assert_eq!(command(&other.content), ("base64_enc@other_bot", "hi"));
    }

    #[test]
    fn strips_any_mention_when_username_unknown() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/help@whatever_bot", None);
        assert_eq!(command(&msg.content), ("help", ""));
    }

    #[test]
    fn plain_and_empty_text() {
        let parser = MessageParser::new("/");
        assert_eq!(parser.parse("1", "hello", None).content, Content::Text("hello".into()));
        assert_eq!(parser.parse("1", "  ", None).content, Content::Empty);
    }

    #[test]
    fn keeps_sender() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/help", Some(User::new("7")));
        assert_eq!(msg.sender.map(|u| u.id), Some("7".to_string()));
    }
}
