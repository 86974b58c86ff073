//! LLM endpoint configuration

use serde::{Deserialize, Serialize};

/// Hosted chat-completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hosted model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds; unset means the client default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    /// Full URL of the chat-completion endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
