use super::{Message, Reply};
use crate::application::errors::CommandError;

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Message) -> Result<Reply, CommandError> + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    /// Argument placeholder shown in help, e.g. `<text>`
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            usage: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<Reply, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input)
    }

    /// Help line, e.g. `/base64_enc <text> - Encode the given text to Base64`
    pub fn help_line(&self, prefix: &str) -> String {
        let mut line = format!("{}{}", prefix, self.name);
        if let Some(usage) = &self.usage {
            line.push(' ');
            line.push_str(usage);
        }
        if let Some(desc) = &self.description {
            line.push_str(" - ");
            line.push_str(desc);
        }
        line
    }
}

/// Command registry, iterated in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any earlier one with the same name
    pub fn register(&mut self, command: Command) {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
