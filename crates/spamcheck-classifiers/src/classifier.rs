//! Spam classifier and common types

use serde::{Deserialize, Serialize};
use spamcheck_core::{Error, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Binary classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpamLabel {
    /// Legitimate message (logit index 0)
    Ham,
    /// Unwanted message (logit index 1)
    Spam,
}

impl SpamLabel {
    /// Logit position of this label
    pub fn index(self) -> usize {
        match self {
            Self::Ham => 0,
            Self::Spam => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }

    pub fn is_spam(self) -> bool {
        self == Self::Spam
    }
}

impl fmt::Display for SpamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ham => f.write_str("Ham"),
            Self::Spam => f.write_str("Spam"),
        }
    }
}

/// Map a two-element score vector to a label by arg-max.
///
/// Index 1 is spam, index 0 is ham. Ties go to ham.
pub fn label_from_logits(logits: &[f32]) -> Result<SpamLabel> {
    match logits {
        [ham, spam] => {
            if spam > ham {
                Ok(SpamLabel::Spam)
            } else {
                Ok(SpamLabel::Ham)
            }
        }
        other => Err(Error::classifier(format!(
            "expected 2 logits, model produced {}",
            other.len()
        ))),
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Result of classifying one message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Arg-max label
    pub label: SpamLabel,

    /// Softmax probability of the predicted label (0.0-1.0)
    pub score: f32,

    /// Raw logits as produced by the model, `[ham, spam]`
    pub logits: Vec<f32>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Build a result from raw logits
    pub fn from_logits(logits: Vec<f32>, latency_us: u64) -> Result<Self> {
        let label = label_from_logits(&logits)?;
        let score = softmax(&logits)[label.index()];

        Ok(Self {
            label,
            score,
            logits,
            latency_us,
        })
    }

    /// Probability assigned to the spam class
    pub fn spam_probability(&self) -> f32 {
        softmax(&self.logits)[SpamLabel::Spam.index()]
    }
}

/// A model that turns one message into two class logits
///
/// Implementations run synchronously; [`SpamClassifier`] moves the call onto
/// the blocking pool.
pub trait SpamModel: Send + Sync {
    /// Run one forward pass and return `[ham, spam]` logits
    fn logits(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the model name
    fn name(&self) -> &str;
}

/// Validating front-end over a loaded [`SpamModel`]
#[derive(Clone)]
pub struct SpamClassifier {
    model: Arc<dyn SpamModel>,
}

impl SpamClassifier {
    pub fn new(model: Arc<dyn SpamModel>) -> Self {
        Self { model }
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify on the current thread
    pub fn classify_blocking(&self, message: &str) -> Result<ClassificationResult> {
        if message.trim().is_empty() {
            return Err(Error::validation("Please enter a message to classify."));
        }

        let start = Instant::now();
        let logits = self.model.logits(message)?;
        let latency_us = start.elapsed().as_micros() as u64;

        let result = ClassificationResult::from_logits(logits, latency_us)?;

        metrics::counter!(
            "spamcheck_classifications_total",
            "label" => result.label.as_str()
        )
        .increment(1);
        metrics::histogram!("spamcheck_classification_latency_us").record(latency_us as f64);

        tracing::debug!(
            model = self.model.name(),
            label = %result.label,
            score = result.score,
            latency_us,
            "Classified message"
        );

        Ok(result)
    }

    /// Classify on tokio's blocking pool
    pub async fn classify(&self, message: &str) -> Result<ClassificationResult> {
        let classifier = self.clone();
        let message = message.to_string();

        tokio::task::spawn_blocking(move || classifier.classify_blocking(&message))
            .await
            .map_err(|e| Error::classifier(format!("Inference task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_one_is_spam() {
        assert_eq!(label_from_logits(&[-1.2, 3.4]).unwrap(), SpamLabel::Spam);
        assert_eq!(label_from_logits(&[2.0, -0.5]).unwrap(), SpamLabel::Ham);
    }

    #[test]
    fn test_tie_is_ham() {
        assert_eq!(label_from_logits(&[0.3, 0.3]).unwrap(), SpamLabel::Ham);
    }

    #[test]
    fn test_wrong_logit_count() {
        let err = label_from_logits(&[0.1, 0.2, 0.7]).unwrap_err();
        assert!(matches!(err, Error::Classifier(_)));
        assert!(label_from_logits(&[]).is_err());
    }

    #[test]
    fn test_score_is_probability_of_predicted_label() {
        let result = ClassificationResult::from_logits(vec![0.0, 2.0], 10).unwrap();
        assert_eq!(result.label, SpamLabel::Spam);
        assert!(result.score > 0.85 && result.score < 0.9);
        assert!((result.spam_probability() - result.score).abs() < f32::EPSILON);

        let ham = ClassificationResult::from_logits(vec![2.0, 0.0], 10).unwrap();
        assert_eq!(ham.label, SpamLabel::Ham);
        assert!((ham.score + ham.spam_probability() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_label_display_and_serde() {
        assert_eq!(SpamLabel::Spam.to_string(), "Spam");
        assert_eq!(SpamLabel::Ham.to_string(), "Ham");
        assert_eq!(serde_json::to_string(&SpamLabel::Spam).unwrap(), "\"spam\"");
    }
}
