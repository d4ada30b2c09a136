//! Message handling - parsing and dispatching

pub mod dispatcher;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use parser::{extract_argument, MessageParser};
