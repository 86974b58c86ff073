//! Model loading from local directories
//!
//! The model directory holds `config.json` and `model.safetensors` of a BERT
//! sequence-classification checkpoint. The tokenizer directory holds either a
//! `tokenizer.json` or a WordPiece `vocab.txt` (with an optional
//! `tokenizer_config.json`).

use crate::bert::BertSpamModel;
use crate::config::ClassifierConfig;
use candle_core::{DType, Device};
use candle_nn::{Linear, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use spamcheck_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

const NUM_LABELS: usize = 2;

/// Loads the spam model and tokenizer described by a [`ClassifierConfig`]
pub struct ClassifierLoader {
    config: ClassifierConfig,
}

/// Fields of `config.json` that the candle BERT config does not expose
#[derive(Debug, Default, Deserialize)]
struct HeadConfig {
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
    #[serde(default, rename = "_name_or_path")]
    name_or_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenizerSettings {
    #[serde(default = "default_true")]
    do_lower_case: bool,
}

fn default_true() -> bool {
    true
}

impl ClassifierLoader {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Load model and tokenizer. Any failure is a [`Error::ModelLoad`].
    pub fn load(&self) -> Result<BertSpamModel> {
        let start = Instant::now();
        let model_dir = &self.config.model_dir;
        let tokenizer_dir = &self.config.tokenizer_dir;

        tracing::info!(
            "Loading spam classifier from {} (tokenizer: {})",
            model_dir.display(),
            tokenizer_dir.display()
        );

        ensure_dir(model_dir, "Model")?;
        ensure_dir(tokenizer_dir, "Tokenizer")?;

        let config_path = model_dir.join("config.json");
        let bert_config: BertConfig = parse_json_config(&config_path)?;
        let head_config: HeadConfig = parse_json_config(&config_path)?;

        let num_labels = head_config
            .id2label
            .as_ref()
            .map(|labels| labels.len())
            .unwrap_or(NUM_LABELS);
        if num_labels != NUM_LABELS {
            return Err(Error::model_load(format!(
                "Expected a binary classifier, {} declares {} labels",
                config_path.display(),
                num_labels
            )));
        }

        let tokenizer = load_tokenizer(
            tokenizer_dir,
            self.config.max_length,
            self.config.pad_to_max_length,
        )?;

        let device = get_device(&self.config.device)?;
        let vb = load_var_builder(model_dir, &device)?;

        let (model, vb_backbone) = load_bert_backbone(&vb, &bert_config)?;

        let pooler = candle_nn::linear(
            bert_config.hidden_size,
            bert_config.hidden_size,
            vb_backbone.pp("pooler").pp("dense"),
        )
        .map_err(|e| Error::model_load(format!("Failed to load pooler weights: {}", e)))?;

        let classifier = load_classification_head(&vb, bert_config.hidden_size)?;

        let name = head_config
            .name_or_path
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| model_dir.display().to_string());

        tracing::info!(
            "Loaded spam classifier '{}' in {}ms",
            name,
            start.elapsed().as_millis()
        );

        Ok(BertSpamModel {
            name,
            tokenizer,
            model,
            pooler,
            classifier,
            device,
            max_length: self.config.max_length,
        })
    }
}

fn ensure_dir(path: &Path, what: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::model_load(format!(
            "{} directory does not exist: {}",
            what,
            path.display()
        )));
    }
    Ok(())
}

fn get_device(device_str: &str) -> Result<Device> {
    match device_str.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0)
            .map_err(|e| Error::model_load(format!("Failed to initialize CUDA: {}", e))),
        "mps" | "metal" => Device::new_metal(0)
            .map_err(|e| Error::model_load(format!("Failed to initialize Metal: {}", e))),
        _ => Ok(Device::Cpu),
    }
}

fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        Error::model_load(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::model_load(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}

fn load_var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_dir.join("model.safetensors");
    if !weights_path.exists() {
        let hint = if model_dir.join("tf_model.h5").exists() {
            " (found tf_model.h5; convert it to model.safetensors first)"
        } else {
            ""
        };
        return Err(Error::model_load(format!(
            "model.safetensors not found in {}{}",
            model_dir.display(),
            hint
        )));
    }

    // SAFETY: the weights file is treated as read-only for the process lifetime.
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::model_load(format!("Failed to load weights: {}", e)))?
    };

    Ok(vb)
}

/// Hugging Face checkpoints nest the encoder under `bert.`; bare exports
/// keep it at the root. Returns the backbone and the builder it came from.
fn load_bert_backbone<'a>(
    vb: &VarBuilder<'a>,
    config: &BertConfig,
) -> Result<(BertModel, VarBuilder<'a>)> {
    let nested = vb.pp("bert");
    let nested_err = match BertModel::load(nested.clone(), config) {
        Ok(model) => return Ok((model, nested)),
        Err(e) => e,
    };

    match BertModel::load(vb.clone(), config) {
        Ok(model) => {
            tracing::debug!("BERT weights found at the checkpoint root");
            Ok((model, vb.clone()))
        }
        Err(root_err) => Err(Error::model_load(format!(
            "Failed to load BERT backbone (bert.*: {}; root: {})",
            nested_err, root_err
        ))),
    }
}

fn load_classification_head(vb: &VarBuilder, hidden_size: usize) -> Result<Linear> {
    candle_nn::linear(hidden_size, NUM_LABELS, vb.pp("classifier")).map_err(|e| {
        Error::model_load(format!(
            "No classification head found (expected 'classifier' with {} labels): {}",
            NUM_LABELS, e
        ))
    })
}

/// Load the tokenizer and apply the truncation/padding policy.
pub fn load_tokenizer(
    tokenizer_dir: &Path,
    max_length: usize,
    pad_to_max_length: bool,
) -> Result<Tokenizer> {
    let mut tokenizer = read_tokenizer(tokenizer_dir)?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::model_load(format!("Failed to configure truncation: {}", e)))?;

    let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(0);
    let strategy = if pad_to_max_length {
        PaddingStrategy::Fixed(max_length)
    } else {
        PaddingStrategy::BatchLongest
    };
    tokenizer.with_padding(Some(PaddingParams {
        strategy,
        pad_id,
        pad_token: "[PAD]".to_string(),
        ..Default::default()
    }));

    Ok(tokenizer)
}

fn read_tokenizer(tokenizer_dir: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = tokenizer_dir.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::model_load(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_path = tokenizer_dir.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let settings_path = tokenizer_dir.join("tokenizer_config.json");
        let lowercase = if settings_path.exists() {
            parse_json_config::<TokenizerSettings>(&settings_path)?.do_lower_case
        } else {
            true
        };

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| Error::model_load(format!("Failed to build WordPiece model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::new(true, true, None, lowercase)));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

        let special = |token: &str| {
            tokenizer
                .token_to_id(token)
                .map(|id| (token.to_string(), id))
                .ok_or_else(|| {
                    Error::model_load(format!("{} missing from {}", token, vocab_path.display()))
                })
        };
        let sep = special("[SEP]")?;
        let cls = special("[CLS]")?;
        tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

        return Ok(tokenizer);
    }

    Err(Error::model_load(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        tokenizer_dir.display()
    )))
}
