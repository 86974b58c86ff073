//! Classifier configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the model lives and how inference runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Directory holding `config.json` and `model.safetensors`
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Directory holding `tokenizer.json` or `vocab.txt`
    #[serde(default = "default_tokenizer_dir")]
    pub tokenizer_dir: PathBuf,

    /// Maximum sequence length; longer inputs are truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Device to run on (cpu, cuda, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Pad every input to exactly `max_length` tokens
    #[serde(default)]
    pub pad_to_max_length: bool,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("Bert")
}

fn default_tokenizer_dir() -> PathBuf {
    PathBuf::from("Tokenizer")
}

fn default_max_length() -> usize {
    512
}

fn default_device() -> String {
    "cpu".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            tokenizer_dir: default_tokenizer_dir(),
            max_length: default_max_length(),
            device: default_device(),
            pad_to_max_length: false,
        }
    }
}
