//! Domain layer - Core business objects
//! 
//! This layer contains:
//! - Entities: Messages, commands and replies
//! - Traits: Abstractions for infrastructure (Bot)

pub mod entities;
pub mod traits;
