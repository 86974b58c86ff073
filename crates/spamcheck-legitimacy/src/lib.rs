//! SpamCheck Legitimacy
//!
//! Asks a hosted LLM whether a company is legitimate.
//!
//! - [`client`]: the [`ChatBackend`] seam and the OpenAI-compatible
//!   [`GroqClient`]
//! - [`query`]: prompt construction and first-choice extraction
//! - [`cache`]: per-process memoization keyed by `(company, api key)`

pub mod cache;
pub mod client;
pub mod config;
pub mod query;

pub use cache::ResultCache;
pub use client::{ChatBackend, GroqClient};
pub use config::LlmConfig;
pub use query::{legitimacy_prompt, validate_inputs, LegitimacyQuery, LegitimacyReport};
