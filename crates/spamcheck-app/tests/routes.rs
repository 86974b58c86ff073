//! End-to-end handler tests over the full router
//!
//! The spam model and the chat backend are replaced by counting stubs so
//! each test can assert how many times a component actually ran.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use spamcheck_app::config::Credential;
use spamcheck_app::server::{
    build_app, EMPTY_COMPANY_WARNING, EMPTY_MESSAGE_WARNING, MISSING_CREDENTIAL_ERROR,
    MODEL_UNAVAILABLE_ERROR,
};
use spamcheck_app::state::{AppState, ClassifierStatus};
use spamcheck_classifiers::{SpamClassifier, SpamModel};
use spamcheck_core::{ChatRequest, ChatResponse, Error, Result};
use spamcheck_legitimacy::{ChatBackend, LegitimacyQuery, ResultCache};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct CountingModel {
    call_count: AtomicU32,
}

impl CountingModel {
    fn new() -> Self {
        Self {
            call_count: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl SpamModel for CountingModel {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if text.to_uppercase().contains("FREE") {
            Ok(vec![-2.0, 3.0])
        } else {
            Ok(vec![2.5, -1.0])
        }
    }

    fn name(&self) -> &str {
        "counting-stub"
    }
}

struct CountingBackend {
    fail_with: Option<String>,
    call_count: AtomicU32,
}

impl CountingBackend {
    fn replying() -> Self {
        Self {
            fail_with: None,
            call_count: AtomicU32::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            call_count: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for CountingBackend {
    async fn complete(&self, _api_key: &str, request: &ChatRequest) -> Result<ChatResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.fail_with {
            return Err(Error::external(message.clone()));
        }

        let prompt = &request.messages[0].content;
        let body = serde_json::json!({
            "id": "chatcmpl-stub",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": format!("Report for: {}", prompt) },
                "finish_reason": "stop"
            }]
        });
        Ok(serde_json::from_value(body).unwrap())
    }

    fn name(&self) -> &str {
        "counting-stub"
    }
}

struct Fixture {
    app: Router,
    model: Arc<CountingModel>,
    backend: Arc<CountingBackend>,
}

fn fixture(backend: CountingBackend, credential: Option<&str>) -> Fixture {
    let model = Arc::new(CountingModel::new());
    let backend = Arc::new(backend);

    let classifier = ClassifierStatus::Ready(SpamClassifier::new(model.clone()));
    let cache = ResultCache::new(LegitimacyQuery::new(backend.clone(), "llama-3.1-8b-instant"));
    let state = AppState::new(classifier, cache, credential.and_then(Credential::new));

    Fixture {
        app: build_app(state),
        model,
        backend,
    }
}

fn unavailable_fixture() -> (Router, Arc<CountingBackend>) {
    let backend = Arc::new(CountingBackend::replying());
    let classifier = ClassifierStatus::Unavailable {
        reason: "Model directory does not exist: Bert".to_string(),
    };
    let cache = ResultCache::new(LegitimacyQuery::new(backend.clone(), "llama-3.1-8b-instant"));
    let state = AppState::new(classifier, cache, Credential::new("gsk_test"));
    (build_app(state), backend)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

// ============================================================================
// Spam classifier panel
// ============================================================================

#[tokio::test]
async fn test_classify_spam_message() {
    let f = fixture(CountingBackend::replying(), Some("gsk_test"));

    let outcome = post_json(
        &f.app,
        "/api/classify",
        serde_json::json!({ "message": "WIN a FREE iPhone now!!! Click here" }),
    )
    .await;

    assert_eq!(outcome["status"], "rendered");
    assert_eq!(outcome["label"], "spam");
    assert_eq!(outcome["message"], "This message is classified as Spam.");
    assert_eq!(f.model.call_count(), 1);
}

#[tokio::test]
async fn test_classify_ham_message() {
    let f = fixture(CountingBackend::replying(), Some("gsk_test"));

    let outcome = post_json(
        &f.app,
        "/api/classify",
        serde_json::json!({ "message": "Hey, are we still meeting for lunch tomorrow?" }),
    )
    .await;

    assert_eq!(outcome["status"], "rendered");
    assert_eq!(outcome["label"], "ham");
    assert_eq!(
        outcome["message"],
        "This message is classified as Ham (Not Spam)."
    );
}

#[tokio::test]
async fn test_empty_message_warns_without_running_model() {
    let f = fixture(CountingBackend::replying(), Some("gsk_test"));

    for message in ["", "   \n\t"] {
        let outcome = post_json(
            &f.app,
            "/api/classify",
            serde_json::json!({ "message": message }),
        )
        .await;

        assert_eq!(outcome["status"], "warning");
        assert_eq!(outcome["message"], EMPTY_MESSAGE_WARNING);
    }

    assert_eq!(f.model.call_count(), 0);
}

#[tokio::test]
async fn test_unavailable_model_reports_error() {
    let (app, _) = unavailable_fixture();

    let outcome = post_json(
        &app,
        "/api/classify",
        serde_json::json!({ "message": "Hello" }),
    )
    .await;

    assert_eq!(outcome["status"], "error");
    assert_eq!(outcome["message"], MODEL_UNAVAILABLE_ERROR);
}

#[tokio::test]
async fn test_legitimacy_works_without_model() {
    let (app, backend) = unavailable_fixture();

    let outcome = post_json(
        &app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "Google" }),
    )
    .await;

    assert_eq!(outcome["status"], "rendered");
    assert_eq!(backend.call_count(), 1);
}

// ============================================================================
// Company legitimacy panel
// ============================================================================

#[tokio::test]
async fn test_repeated_company_hits_backend_once() {
    let f = fixture(CountingBackend::replying(), Some("gsk_test"));

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        outcomes.push(
            post_json(
                &f.app,
                "/api/legitimacy",
                serde_json::json!({ "company_name": "Google" }),
            )
            .await,
        );
    }

    assert_eq!(f.backend.call_count(), 1);
    assert_eq!(outcomes[0]["status"], "rendered");
    assert_eq!(outcomes[0]["message"], "Legitimacy Report:");
    assert_eq!(
        outcomes[0]["report"],
        "Report for: Is Google a legitimate company? Provide a brief summary of your findings."
    );
    assert!(outcomes[0]["report_html"]
        .as_str()
        .unwrap()
        .starts_with("<p>Report for: Is Google"));
    assert!(outcomes.iter().all(|o| *o == outcomes[0]));
}

#[tokio::test]
async fn test_distinct_companies_are_queried_separately() {
    let f = fixture(CountingBackend::replying(), Some("gsk_test"));

    post_json(
        &f.app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "Google" }),
    )
    .await;
    post_json(
        &f.app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "google" }),
    )
    .await;

    assert_eq!(f.backend.call_count(), 2);
}

#[tokio::test]
async fn test_empty_company_warns_without_query() {
    let f = fixture(CountingBackend::replying(), Some("gsk_test"));

    let outcome = post_json(
        &f.app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "  " }),
    )
    .await;

    assert_eq!(outcome["status"], "warning");
    assert_eq!(outcome["message"], EMPTY_COMPANY_WARNING);
    assert_eq!(f.backend.call_count(), 0);
}

#[tokio::test]
async fn test_missing_credential_reports_error() {
    let f = fixture(CountingBackend::replying(), None);

    let outcome = post_json(
        &f.app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "Google" }),
    )
    .await;

    assert_eq!(outcome["status"], "error");
    assert_eq!(outcome["message"], MISSING_CREDENTIAL_ERROR);
    assert_eq!(f.backend.call_count(), 0);
}

#[tokio::test]
async fn test_backend_failure_is_cached() {
    let f = fixture(
        CountingBackend::failing("API returned 401 Unauthorized: Invalid API Key"),
        Some("gsk_bad"),
    );

    let first = post_json(
        &f.app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "Acme" }),
    )
    .await;
    let second = post_json(
        &f.app,
        "/api/legitimacy",
        serde_json::json!({ "company_name": "Acme" }),
    )
    .await;

    assert_eq!(first["status"], "error");
    assert_eq!(
        first["message"],
        "An error occurred: API returned 401 Unauthorized: Invalid API Key"
    );
    assert_eq!(first, second);
    assert_eq!(f.backend.call_count(), 1);
}

// ============================================================================
// Status, health and page
// ============================================================================

#[tokio::test]
async fn test_status_reports_component_readiness() {
    let f = fixture(CountingBackend::replying(), None);
    let (status, body) = get(&f.app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["classifier_ready"], true);
    assert_eq!(json["classifier_model"], "counting-stub");
    assert_eq!(json["credential_configured"], false);

    let (app, _) = unavailable_fixture();
    let (_, body) = get(&app, "/api/status").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["classifier_ready"], false);
    assert_eq!(json["credential_configured"], true);
    assert!(json["classifier_error"]
        .as_str()
        .unwrap()
        .contains("does not exist"));
}

#[tokio::test]
async fn test_health() {
    let f = fixture(CountingBackend::replying(), None);
    let (status, body) = get(&f.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_without_exporter_is_not_found() {
    let f = fixture(CountingBackend::replying(), None);
    let (status, _) = get(&f.app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_page_renders_both_panels() {
    let f = fixture(CountingBackend::replying(), None);
    let (status, body) = get(&f.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Spam &amp; Legitimacy Analyzer"));
    assert!(html.contains("Classify Message"));
    assert!(html.contains("Check Legitimacy"));
}
