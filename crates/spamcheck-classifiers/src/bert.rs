//! BERT sequence classifier
//!
//! Backbone, pooler (dense + tanh over `[CLS]`) and a linear head, matching
//! the layout of a Hugging Face `BertForSequenceClassification` checkpoint.

use crate::classifier::SpamModel;
use candle_core::{Device, IndexOp, Tensor};
use candle_nn::{Linear, Module};
use candle_transformers::models::bert::BertModel;
use spamcheck_core::{Error, Result};
use tokenizers::Tokenizer;

/// Loaded model + tokenizer pair
pub struct BertSpamModel {
    pub(crate) name: String,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) model: BertModel,
    pub(crate) pooler: Linear,
    pub(crate) classifier: Linear,
    pub(crate) device: Device,
    pub(crate) max_length: usize,
}

impl BertSpamModel {
    /// Maximum number of tokens fed to the model
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// The configured tokenizer (truncation and padding applied)
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn to_batch(&self, values: &[u32], what: &str) -> Result<Tensor> {
        Tensor::new(values, &self.device)
            .map_err(|e| Error::classifier(format!("Failed to create {} tensor: {}", what, e)))?
            .unsqueeze(0)
            .map_err(|e| Error::classifier(format!("Failed to unsqueeze {}: {}", what, e)))
    }
}

impl SpamModel for BertSpamModel {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("Tokenization failed: {}", e)))?;

        if encoding.get_overflowing().is_empty() {
            tracing::trace!(tokens = encoding.len(), "Encoded message");
        } else {
            tracing::debug!(max_length = self.max_length, "Message truncated");
        }

        let input_ids = self.to_batch(encoding.get_ids(), "input")?;
        let token_type_ids = self.to_batch(encoding.get_type_ids(), "token type")?;
        let attention_mask = self.to_batch(encoding.get_attention_mask(), "attention mask")?;

        let hidden_states = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {}", e)))?;

        let cls_embedding = hidden_states
            .i((.., 0))
            .map_err(|e| Error::classifier(format!("Failed to get CLS token: {}", e)))?;

        let pooled = self
            .pooler
            .forward(&cls_embedding)
            .and_then(|t| t.tanh())
            .map_err(|e| Error::classifier(format!("Pooler failed: {}", e)))?;

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::classifier(format!("Classification head failed: {}", e)))?;

        logits
            .squeeze(0)
            .map_err(|e| Error::classifier(format!("Squeeze failed: {}", e)))?
            .to_vec1::<f32>()
            .map_err(|e| Error::classifier(format!("Failed to convert to vec: {}", e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
