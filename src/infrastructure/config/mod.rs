//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_url: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
    /// Pause after a failed getUpdates call
    pub retry_delay_secs: u64,
    /// Publish the command list with setMyCommands at start-up
    pub register_commands: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "b64-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
            register_commands: true,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() || self.bot.prefix.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "bot.prefix must be non-empty without whitespace, got {:?}",
                self.bot.prefix
            )));
        }
        if self.telegram.api_url.is_empty() {
            return Err(ConfigError::MissingField("telegram.api-url".to_string()));
        }
        Ok(())
    }

    /// Defaults overlaid with `BOT_TOKEN`, `BOT_PREFIX` and `TELEGRAM_API_URL`
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("BOT_TOKEN").filter(|t| !t.is_empty()) {
            self.telegram.token = Some(token);
        }

        if let Some(prefix) = var("BOT_PREFIX").filter(|p| !p.is_empty()) {
            self.bot.prefix = prefix;
        }

        if let Some(url) = var("TELEGRAM_API_URL").filter(|u| !u.is_empty()) {
            self.telegram.api_url = url;
        }
    }

    /// Token from the command line, falling back to configuration
    pub fn resolve_token(&self, token_override: Option<String>) -> Option<String> {
        token_override
            .filter(|t| !t.is_empty())
            .or_else(|| self.telegram.token.clone().filter(|t| !t.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_full_yaml() {
        let yaml = r#"
bot:
  name: test-bot
  prefix: "!"
telegram:
  token: "123:abc"
  api-url: http://localhost:8081
  poll-timeout-secs: 10
  retry-delay-secs: 1
  register-commands: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.bot.name, "test-bot");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.telegram.token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram.api_url, "http://localhost:8081");
        assert_eq!(config.telegram.poll_timeout_secs, 10);
        assert_eq!(config.telegram.retry_delay_secs, 1);
        assert!(!config.telegram.register_commands);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::from_yaml("telegram:\n  token: \"t\"\n").unwrap();
        assert_eq!(config.bot.prefix, "/");
        assert_eq!(config.telegram.api_url, DEFAULT_API_URL);
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert!(config.telegram.register_commands);
    }

    #[test]
    fn rejects_blank_prefix() {
        let err = Config::from_yaml("bot:\n  prefix: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(Config::from_yaml("bot: [unclosed"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("poll-timeout-secs: 30"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.name, "b64-bot");
    }

    #[test]
    fn env_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("BOT_TOKEN", "42:xyz"),
            ("BOT_PREFIX", ""),
            ("TELEGRAM_API_URL", "http://127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.telegram.token.as_deref(), Some("42:xyz"));
        assert_eq!(config.bot.prefix, "/");
        assert_eq!(config.telegram.api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn token_override_wins() {
        let mut config = Config::default();
        config.telegram.token = Some("from-config".to_string());

        assert_eq!(config.resolve_token(Some("from-cli".into())).as_deref(), Some("from-cli"));
        assert_eq!(config.resolve_token(Some(String::new())).as_deref(), Some("from-config"));
        assert_eq!(config.resolve_token(None).as_deref(), Some("from-config"));
        assert_eq!(Config::default().resolve_token(None), None);
    }
}
