//! Legitimacy query

use crate::client::ChatBackend;
use serde::{Deserialize, Serialize};
use spamcheck_core::{ChatRequest, Error, Result};
use std::fmt;
use std::sync::Arc;

/// Prompt sent for `company_name`
pub fn legitimacy_prompt(company_name: &str) -> String {
    format!(
        "Is {} a legitimate company? Provide a brief summary of your findings.",
        company_name
    )
}

/// Reject a blank company name or API key before anything is sent or cached
pub fn validate_inputs(company_name: &str, api_key: &str) -> Result<()> {
    if company_name.trim().is_empty() {
        return Err(Error::validation("Please enter a company name."));
    }
    if api_key.trim().is_empty() {
        return Err(Error::missing_credential("Groq API key not provided."));
    }
    Ok(())
}

/// Outcome of one legitimacy check, always displayable as a non-empty string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum LegitimacyReport {
    /// First completion choice, verbatim
    Summary(String),
    /// Descriptive failure text
    Failed(String),
}

impl LegitimacyReport {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Text shown to the user
    pub fn text(&self) -> &str {
        match self {
            Self::Summary(text) | Self::Failed(text) => text,
        }
    }
}

impl From<Result<String>> for LegitimacyReport {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(summary) => Self::Summary(summary),
            Err(e) => Self::Failed(format!("An error occurred: {}", e)),
        }
    }
}

impl fmt::Display for LegitimacyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Builds the prompt, calls the backend once, and extracts the answer
#[derive(Clone)]
pub struct LegitimacyQuery {
    backend: Arc<dyn ChatBackend>,
    model: String,
}

impl LegitimacyQuery {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask whether `company_name` is legitimate.
    ///
    /// No retries. Every failure comes back as an `Err`; callers decide how
    /// to display it.
    pub async fn query(&self, company_name: &str, api_key: &str) -> Result<String> {
        validate_inputs(company_name, api_key)?;
        let company_name = company_name.trim();

        let request = ChatRequest::single_user(&self.model, legitimacy_prompt(company_name));
        let response = self.backend.complete(api_key, &request).await?;

        let content = response
            .first_content()
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                Error::external(format!(
                    "{} returned no completion content",
                    self.backend.name()
                ))
            })?;

        tracing::info!(
            company = company_name,
            model = %self.model,
            chars = content.len(),
            "Received legitimacy summary"
        );

        Ok(content.to_string())
    }
}
