//! Result of one button press

use serde::{Deserialize, Serialize};
use crate::server::markdown::render_markdown;
use spamcheck_classifiers::SpamLabel;

pub const EMPTY_MESSAGE_WARNING: &str = "Please enter a message to classify.";
pub const EMPTY_COMPANY_WARNING: &str = "Please enter a company name.";
pub const MODEL_UNAVAILABLE_ERROR: &str =
    "Spam classification model could not be loaded. Please check the model files.";
pub const MISSING_CREDENTIAL_ERROR: &str =
    "Please configure your Groq API key (GROQ_API_KEY) to use this feature.";

/// What a panel renders after a button press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelOutcome {
    /// The component ran and produced a result
    Rendered(Rendered),
    /// Input was rejected before any component ran
    Warning { message: String },
    /// The action could not be completed
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<SpamLabel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,

    /// `report` rendered from markdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_html: Option<String>,
}

impl PanelOutcome {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn classified(label: SpamLabel, score: f32) -> Self {
        let message = match label {
            SpamLabel::Spam => "This message is classified as Spam.",
            SpamLabel::Ham => "This message is classified as Ham (Not Spam).",
        };

        Self::Rendered(Rendered {
            message: message.to_string(),
            label: Some(label),
            score: Some(score),
            report: None,
            report_html: None,
        })
    }

    pub fn report(report: impl Into<String>) -> Self {
        let report = report.into();

        Self::Rendered(Rendered {
            message: "Legitimacy Report:".to_string(),
            label: None,
            score: None,
            report_html: Some(render_markdown(&report)),
            report: Some(report),
        })
    }
}
