//! Platform adapters

pub mod telegram;
pub mod console;

pub use telegram::TelegramAdapter;
pub use console::ConsoleAdapter;
