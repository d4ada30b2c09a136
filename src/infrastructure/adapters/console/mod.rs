//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;
use crate::domain::entities::Reply;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

pub const CONSOLE_CHAT_ID: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    stdin: Mutex<BufReader<Stdin>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "b64-bot".to_string(),
                username: "console".to_string(),
            },
            stdin: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    /// Read one line, `None` at end of input
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await.ok()?;
        stdout.flush().await.ok()?;

        let mut input = String::new();
        match self.stdin.lock().await.read_line(&mut input).await {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_reply(&self, _chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        println!("[BOT] {}", reply.text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
