//! SpamCheck Classifiers
//!
//! Binary spam/ham classification with a pretrained BERT sequence classifier.
//!
//! The model and its tokenizer are loaded once from two local directories
//! (`Bert/` and `Tokenizer/` by default) by [`ClassifierLoader`]. The loaded
//! [`BertSpamModel`] is wrapped in a [`SpamClassifier`], which validates input,
//! runs inference on the blocking pool and maps the two logits to a
//! [`SpamLabel`].

pub mod bert;
pub mod classifier;
pub mod config;
pub mod loader;

pub use bert::BertSpamModel;
pub use classifier::{label_from_logits, ClassificationResult, SpamClassifier, SpamLabel, SpamModel};
pub use config::ClassifierConfig;
pub use loader::ClassifierLoader;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, SpamClassifier, SpamLabel, SpamModel};
    pub use crate::config::ClassifierConfig;
    pub use crate::loader::ClassifierLoader;
}
