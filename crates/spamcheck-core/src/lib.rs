//! SpamCheck Core
//!
//! Core types and utilities shared across SpamCheck components.
//!
//! This crate provides:
//! - The error taxonomy used by the classifier, the legitimacy query and the app
//! - OpenAI-compatible chat-completion wire types

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ChatChoice, ChatMessage, ChatRequest, ChatResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ChatMessage, ChatRequest, ChatResponse};
}
