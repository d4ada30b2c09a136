use crate::application::codec;
use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry, Content, Message, Reply};

pub const ENCODE_USAGE: &str = "Please provide a string to encode. Usage: /base64_enc your_text";
pub const DECODE_USAGE: &str =
    "Please provide a base64 encoded string to decode. Usage: /base64_dec your_base64_string";
pub const DECODE_FAILED: &str =
    "Failed to decode base64 string. Please make sure it's a valid base64 encoded string.";

const HELP_HEADER: &str = "I can help you with the following commands:";
const HELP_FOOTER: &str = "Just send any of these commands to get started!";

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    /// Register `/help`, `/base64_enc` and `/base64_dec`
    pub fn register_defaults(&mut self) {
        // No handler: answered with the registry listing, bare command only.
        self.register(Command::new("help")
            .with_description("Show this help message"));

        self.register(Command::new("base64_enc")
            .with_description("Encode the given text to Base64")
            .with_usage("<text>")
            .with_handler(|msg| {
                let input = argument(msg);
                if input.is_empty() {
                    return Err(CommandError::InvalidArgs(ENCODE_USAGE.to_string()));
                }
                Ok(Reply::code_block(&codec::encode(input)))
            }));

        self.register(Command::new("base64_dec")
            .with_description("Decode the given Base64 string")
            .with_usage("<base64_string>")
            .with_handler(|msg| {
                let input = argument(msg);
                if input.is_empty() {
                    return Err(CommandError::InvalidArgs(DECODE_USAGE.to_string()));
                }
                let decoded = codec::decode(input).inspect_err(|e| {
                    tracing::warn!("base64 decode of [{}] failed: {}", input, e);
                })?;
                Ok(Reply::code_block(&decoded))
            }));
    }

    /// Run the command carried by `message`.
    ///
    /// Returns `Ok(None)` for non-command messages and for a handler-less
    /// command given an argument (`/help me` is not `/help`). Argument and
    /// decode failures are answered with a user-facing reply rather than an
    /// error.
    pub fn handle(&self, message: &Message) -> Result<Option<Reply>, CommandError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        let Some(handler) = &cmd.handler else {
            if !argument(message).is_empty() {
                tracing::debug!("Ignoring /{} with trailing text", cmd.name);
                return Ok(None);
            }
            return Ok(Some(Reply::plain(self.get_help())));
        };

        match handler(message) {
            Ok(reply) => Ok(Some(reply)),
            Err(CommandError::InvalidArgs(usage)) => Ok(Some(Reply::plain(usage))),
            Err(CommandError::Decode(_)) => Ok(Some(Reply::plain(DECODE_FAILED))),
            Err(e) => Err(e),
        }
    }

    pub fn get_help(&self) -> String {
        let mut help = format!("\n{}\n\n", HELP_HEADER);
        for cmd in self.registry.all() {
            help.push_str(&cmd.help_line(&self.prefix));
            help.push('\n');
        }
        help.push('\n');
        help.push_str(HELP_FOOTER);
        help.push('\n');
        help
    }

    /// Commands as `(name, description)` pairs, for publishing to the platform
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.registry
            .all()
            .map(|c| (c.name.clone(), c.description.clone().unwrap_or_default()))
            .collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

fn argument(message: &Message) -> &str {
    match &message.content {
        Content::Command { argument, .. } => argument,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ParseMode;

    fn service() -> CommandService {
        let mut commands = CommandService::new("/");
        commands.register_defaults();
        commands
    }

    fn run(name: &str, argument: &str) -> Reply {
        service()
            .handle(&Message::from_command("1", name, argument))
            .unwrap()
            .expect("command should reply")
    }

    #[test]
    fn help_lists_commands_in_order() {
        let expected = "\nI can help you with the following commands:\n\n\
            /help - Show this help message\n\
            /base64_enc <text> - Encode the given text to Base64\n\
            /base64_dec <base64_string> - Decode the given Base64 string\n\n\
            Just send any of these commands to get started!\n";

        let reply = run("help", "");
        assert_eq!(reply.text, expected);
        assert_eq!(reply.parse_mode, None);
    }

    #[test]
    fn help_with_argument_gets_no_reply() {
        let result = service().handle(&Message::from_command("1", "help", "me please")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn encode_replies_with_code_block() {
        let reply = run("base64_enc", "hello world");
        assert_eq!(reply.text, "```\naGVsbG8gd29ybGQ=\n```");
        assert_eq!(reply.parse_mode, Some(ParseMode::Markdown));
    }

    #[test]
    fn encode_without_argument_shows_usage() {
        assert_eq!(run("base64_enc", ""), Reply::plain(ENCODE_USAGE));
    }

    #[test]
    fn decode_replies_with_code_block() {
        let reply = run("base64_dec", "aGVsbG8gd29ybGQ=");
        assert_eq!(reply.text, "```\nhello world\n```");
        assert_eq!(reply.parse_mode, Some(ParseMode::Markdown));
    }

    #[test]
    fn decode_without_argument_shows_usage() {
        assert_eq!(run("base64_dec", ""), Reply::plain(DECODE_USAGE));
    }

    #[test]
    fn decode_invalid_input_shows_error() {
        assert_eq!(run("base64_dec", "%%%"), Reply::plain(DECODE_FAILED));
    }

    #[test]
    fn unknown_command_is_not_found() {
        let result = service().handle(&Message::from_command("1", "weather", ""));
        assert!(matches!(result, Err(CommandError::NotFound(name)) if name == "weather"));
    }

    #[test]
    fn text_message_is_ignored() {
        let result = service().handle(&Message::from_text("1", "hi")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn descriptions_follow_registry() {
        let names: Vec<String> = service().descriptions().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["help", "base64_enc", "base64_dec"]);
    }
}
