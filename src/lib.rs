//! b64-bot - a Telegram bot that encodes and decodes base64

pub mod domain;
pub mod application;
pub mod infrastructure;
