use crate::server::outcome::{
    PanelOutcome, EMPTY_COMPANY_WARNING, EMPTY_MESSAGE_WARNING, MISSING_CREDENTIAL_ERROR,
    MODEL_UNAVAILABLE_ERROR,
};
use crate::state::{AppState, ClassifierStatus};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use spamcheck_core::Error;

// ============================================================================
// Health endpoints
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics_handle {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics exporter not installed".to_string(),
        ),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub classifier_ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_model: Option<String>,
    pub credential_configured: bool,
    pub cached_reports: usize,
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let (classifier_error, classifier_model) = match &state.classifier {
        ClassifierStatus::Ready(classifier) => (None, Some(classifier.model_name().to_string())),
        ClassifierStatus::Unavailable { reason } => (Some(reason.clone()), None),
    };

    Json(StatusResponse {
        classifier_ready: state.classifier.is_ready(),
        classifier_error,
        classifier_model,
        credential_configured: state.credential.is_some(),
        cached_reports: state.legitimacy.len(),
    })
}

// ============================================================================
// Spam classifier panel
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub message: String,
}

pub async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Json<PanelOutcome> {
    if req.message.trim().is_empty() {
        return Json(PanelOutcome::warning(EMPTY_MESSAGE_WARNING));
    }

    let classifier = match &state.classifier {
        ClassifierStatus::Ready(classifier) => classifier,
        ClassifierStatus::Unavailable { .. } => {
            return Json(PanelOutcome::error(MODEL_UNAVAILABLE_ERROR));
        }
    };

    let outcome = match classifier.classify(&req.message).await {
        Ok(result) => PanelOutcome::classified(result.label, result.score),
        Err(Error::Validation(message)) => PanelOutcome::warning(message),
        Err(e) => {
            tracing::error!("Classification failed: {}", e);
            PanelOutcome::error(format!("An error occurred: {}", e))
        }
    };

    Json(outcome)
}

// ============================================================================
// Company legitimacy panel
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LegitimacyRequest {
    #[serde(default)]
    pub company_name: String,
}

pub async fn check_legitimacy(
    State(state): State<AppState>,
    Json(req): Json<LegitimacyRequest>,
) -> Json<PanelOutcome> {
    if req.company_name.trim().is_empty() {
        return Json(PanelOutcome::warning(EMPTY_COMPANY_WARNING));
    }

    let Some(credential) = &state.credential else {
        return Json(PanelOutcome::error(MISSING_CREDENTIAL_ERROR));
    };

    // Cache key is the name exactly as entered
    tracing::info!("Investigating {}...", req.company_name);
    let outcome = match state
        .legitimacy
        .check(&req.company_name, credential.expose())
        .await
    {
        Ok(report) if report.is_failure() => PanelOutcome::error(report.text()),
        Ok(report) => PanelOutcome::report(report.text()),
        Err(Error::Validation(_)) => PanelOutcome::warning(EMPTY_COMPANY_WARNING),
        Err(Error::MissingCredential(_)) => PanelOutcome::error(MISSING_CREDENTIAL_ERROR),
        Err(e) => PanelOutcome::error(format!("An error occurred: {}", e)),
    };

    Json(outcome)
}
