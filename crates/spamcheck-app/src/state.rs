use crate::config::{AppConfig, Credential};
use metrics_exporter_prometheus::PrometheusHandle;
use spamcheck_classifiers::{ClassifierLoader, SpamClassifier};
use spamcheck_core::Result;
use spamcheck_legitimacy::{ChatBackend, GroqClient, LegitimacyQuery, ResultCache};
use std::sync::Arc;

/// Whether the spam classifier loaded at startup
#[derive(Clone)]
pub enum ClassifierStatus {
    Ready(SpamClassifier),
    /// Load failed; the classification panel stays disabled
    Unavailable { reason: String },
}

impl ClassifierStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Shared application state
///
/// Built once at startup. The model and the legitimacy cache are
/// process-wide: every browser session sees the same instances.
#[derive(Clone)]
pub struct AppState {
    /// Loaded spam classifier, or the reason it is unavailable
    pub classifier: ClassifierStatus,

    /// Memoized legitimacy checks
    pub legitimacy: Arc<ResultCache>,

    /// API key for the legitimacy check
    pub credential: Option<Credential>,

    /// Prometheus handle when the exporter is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        classifier: ClassifierStatus,
        legitimacy: ResultCache,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            classifier,
            legitimacy: Arc::new(legitimacy),
            credential,
            metrics_handle: None,
        }
    }

    /// Load the model and build the Groq client described by `config`.
    ///
    /// A model that fails to load is logged and recorded as unavailable; it
    /// does not fail startup.
    pub async fn from_config(config: &AppConfig, credential: Option<Credential>) -> Result<Self> {
        let loader = ClassifierLoader::new(config.classifier.clone());
        let loaded = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| spamcheck_core::Error::model_load(format!("Model load task failed: {}", e)))
            .and_then(|r| r);

        let classifier = match loaded {
            Ok(model) => ClassifierStatus::Ready(SpamClassifier::new(Arc::new(model))),
            Err(e) => {
                tracing::error!("Error loading spam classification model: {}", e);
                ClassifierStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        let backend: Arc<dyn ChatBackend> = Arc::new(GroqClient::new(&config.llm)?);
        let query = LegitimacyQuery::new(backend, config.llm.model.clone());

        if credential.is_none() {
            tracing::warn!("GROQ_API_KEY is not set; legitimacy checks are disabled");
        }

        Ok(Self::new(classifier, ResultCache::new(query), credential))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
