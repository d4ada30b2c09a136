//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Codec: base64 transcoding
//! - Services: Command execution and reply delivery
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod codec;
pub mod errors;
pub mod services;
pub mod messaging;
