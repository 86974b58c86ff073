//! Error types for SpamCheck

/// Result type alias using SpamCheck's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SpamCheck operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model or tokenizer files missing, corrupt, or incompatible
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// Empty or otherwise unusable user input
    #[error("validation error: {0}")]
    Validation(String),

    /// Legitimacy check attempted without an API key
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Transport, authentication, or API-level failure of the hosted LLM
    #[error("{0}")]
    ExternalService(String),

    /// Inference failure after a successful load
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new missing credential error
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    /// Create a new external service error
    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is a user-input problem rather than a fault
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
