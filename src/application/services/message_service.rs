use crate::domain::entities::{Message, User};
use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::traits::Bot;

/// Service for processing messages and sending replies
pub struct MessageService<B: Bot> {
    bot: B,
    dispatcher: MessageDispatcher,
}

impl<B: Bot> MessageService<B> {
    pub fn new(bot: B, dispatcher: MessageDispatcher) -> Self {
        Self { bot, dispatcher }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.dispatcher
    }

    /// Parse raw text from a chat and handle it
    pub async fn handle_text(&self, chat_id: &str, text: &str, sender: Option<User>) -> Result<Option<String>, BotError> {
        let message = self.dispatcher.parse(chat_id, text, sender);
        self.handle(message).await
    }

    /// Process an incoming message and send the reply, if any.
    ///
    /// Returns the platform id of the sent reply.
    pub async fn handle(&self, message: Message) -> Result<Option<String>, BotError> {
        let reply = self.dispatcher.process(&message).inspect_err(|e| {
            tracing::error!("handle message in chat {}: {}", message.chat_id, e);
        })?;
        let Some(reply) = reply else {
            return Ok(None);
        };

        match self.bot.send_reply(&message.chat_id, &reply).await {
            Ok(id) => {
                tracing::debug!("Replied to chat {} with message {}", message.chat_id, id);
                Ok(Some(id))
            }
            Err(e) => {
                tracing::error!("send message to chat {}: {}", message.chat_id, e);
                Err(e)
            }
        }
    }
}
