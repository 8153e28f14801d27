//! REST API handlers for attribution capture, lead scoring, and operational
//! endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use leadflow_attribution::{
    priority_for, qualification_for, validate_submission, AttributionCapture, ConversionEvent,
    LeadScorer, ValueCalculator,
};
use leadflow_cache::{MemoryStore, ScopedStore};
use leadflow_core::config::ConversionConfig;
use leadflow_core::types::{AttributionData, Lead, Priority, Qualification};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Maximum visitor id length.
const MAX_FIELD_LEN: usize = 256;

/// Maximum landing URL length accepted for capture.
const MAX_URL_LEN: usize = 4096;

/// Slug used when a lead does not say which page it came from.
const DEFAULT_LANDING_PAGE: &str = "business-website";

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub capture: AttributionCapture,
    pub scorer: Arc<LeadScorer>,
    pub values: Arc<ValueCalculator>,
    pub conversion: Arc<ConversionConfig>,
    pub node_id: String,
    pub start_time: Instant,
}

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    /// Anonymous browser id; scopes the stored click id.
    pub visitor_id: String,
    pub url: String,
    #[serde(default)]
    pub referrer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub lead: Lead,
    #[serde(default)]
    pub landing_page: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub correlation_id: Uuid,
    pub score: u32,
    pub qualification: Qualification,
    pub priority: Priority,
    pub conversion_value: u64,
    pub conversion_event: ConversionEvent,
    pub conversion_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_label: Option<String>,
}

fn validate_capture_request(request: &CaptureRequest) -> Result<(), &'static str> {
    if request.visitor_id.is_empty() {
        return Err("'visitor_id' must not be empty");
    }
    if request.visitor_id.len() > MAX_FIELD_LEN {
        return Err("'visitor_id' exceeds maximum length");
    }
    if request.url.len() > MAX_URL_LEN {
        return Err("'url' exceeds maximum length");
    }
    Ok(())
}

/// `/seo-audit/` and `seo-audit` name the same landing page.
fn landing_slug(landing_page: Option<&str>) -> &str {
    landing_page
        .map(|page| page.trim_matches('/'))
        .filter(|slug| !slug.is_empty())
        .unwrap_or(DEFAULT_LANDING_PAGE)
}

fn bad_request(error: &str, message: String) -> (StatusCode, Json<ErrorResponse>) {
    metrics::counter!("api.validation_errors").increment(1);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

/// Body rejections keep axum's status code but use the JSON error shape.
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(error = %rejection, "Rejected request body");
        metrics::counter!("api.validation_errors").increment(1);
        (
            rejection.status(),
            Json(ErrorResponse {
                error: "invalid_json".to_string(),
                message: rejection.body_text(),
            }),
        )
    })
}

/// POST /v1/attribution: capture attribution for a page view.
pub async fn handle_capture(
    State(state): State<AppState>,
    payload: Result<Json<CaptureRequest>, JsonRejection>,
) -> Result<Json<AttributionData>, (StatusCode, Json<ErrorResponse>)> {
    let request = json_body(payload)?;
    if let Err(msg) = validate_capture_request(&request) {
        warn!(error = msg, "Attribution request validation failed");
        return Err(bad_request("invalid_attribution_request", msg.to_string()));
    }

    let visitor_store = ScopedStore::new(&state.store, &request.visitor_id);
    let data = state.capture.capture_from_url(
        &visitor_store,
        &request.url,
        request.referrer.as_deref(),
        Utc::now(),
    );

    metrics::counter!("api.attribution.captured").increment(1);
    Ok(Json(data))
}

/// POST /v1/leads/score: validate, score, and value a lead submission.
pub async fn handle_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = json_body(payload)?;
    let correlation_id = Uuid::new_v4();

    if let Err(e) = validate_submission(request.name.as_deref(), &request.lead) {
        warn!(correlation_id = %correlation_id, error = %e, "Lead validation failed");
        return Err(bad_request("invalid_lead", e.to_string()));
    }

    let lead = &request.lead;
    let slug = landing_slug(request.landing_page.as_deref());
    let score = state.scorer.score(lead);
    let conversion_value = state.values.calculate(slug, lead.budget, lead.timeline);
    let conversion_event = ConversionEvent::for_source(request.source.as_deref().or(Some(slug)));

    let response = ScoreResponse {
        correlation_id,
        score,
        qualification: qualification_for(score),
        priority: priority_for(lead),
        conversion_value,
        conversion_event,
        conversion_id: state.conversion.conversion_id.clone(),
        conversion_label: conversion_event.label(&state.conversion).map(str::to_string),
    };

    metrics::counter!("api.leads.scored").increment(1);
    info!(
        correlation_id = %correlation_id,
        landing_page = slug,
        score = score,
        qualification = ?response.qualification,
        conversion_event = %conversion_event,
        "Lead scored"
    );

    Ok(Json(response))
}

/// GET /health: Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        stored_keys: state.store.len(),
    })
}

/// GET /ready: Readiness probe.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live: Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub stored_keys: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_slug_normalisation() {
        assert_eq!(landing_slug(Some("/seo-audit/")), "seo-audit");
        assert_eq!(landing_slug(Some("enterprise")), "enterprise");
        assert_eq!(landing_slug(Some("/")), DEFAULT_LANDING_PAGE);
        assert_eq!(landing_slug(None), DEFAULT_LANDING_PAGE);
    }

    #[test]
    fn test_capture_request_validation() {
        let ok = CaptureRequest {
            visitor_id: "anon-1".into(),
            url: "/".into(),
            referrer: None,
        };
        assert!(validate_capture_request(&ok).is_ok());

        let empty = CaptureRequest {
            visitor_id: String::new(),
            ..ok
        };
        assert!(validate_capture_request(&empty).is_err());

        let long = CaptureRequest {
            visitor_id: "v".repeat(MAX_FIELD_LEN + 1),
            url: "/".into(),
            referrer: None,
        };
        assert!(validate_capture_request(&long).is_err());
    }

    #[test]
    fn test_score_request_flattens_lead_fields() {
        let request: ScoreRequest = serde_json::from_str(
            r#"{"name": "Priya", "budget": "2lakh-5lakh", "time_on_page": 130,
                "landing_page": "/web-development/", "source": "seo-audit"}"#,
        )
        .unwrap();
        assert_eq!(request.name.as_deref(), Some("Priya"));
        assert_eq!(request.lead.time_on_page, Some(130.0));
        assert_eq!(landing_slug(request.landing_page.as_deref()), "web-development");
        assert_eq!(request.source.as_deref(), Some("seo-audit"));
    }
}
