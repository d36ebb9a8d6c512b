// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the hook service.
//!
//! The caller only branches on the status code; the JSON body is there for
//! humans reading logs on the caller's side.

use crate::config::ConfigHolder;
use crate::error::InputError;
use crate::evaluator::{Evaluator, Outcome};
use crate::request::HookRequest;
use crate::rules::Rule;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Path the automation client posts to.
pub const HOOK_PATH: &str = "/hook";

/// Shared application state.
pub struct AppState {
    pub evaluator: Evaluator,
    pub config: Arc<ConfigHolder>,
}

/// Hook response body.
#[derive(Debug, Serialize)]
pub struct HookResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub code: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(HOOK_PATH, any(hook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "redactedhook",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Evaluate a hook request and answer with the outcome's status code.
pub async fn hook(State(state): State<Arc<AppState>>, method: Method, body: Bytes) -> Response {
    if method != Method::POST {
        warn!(%method, "Rejected non-POST hook request");
        return respond(Outcome::InputError(InputError::MethodNotAllowed));
    }

    let request: HookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "Failed to decode JSON payload");
            return respond(Outcome::InputError(InputError::MalformedBody(err.to_string())));
        }
    };

    debug!(indexer = %request.indexer, torrent_id = request.torrent_id, "Received hook request");

    // The snapshot is held for the whole evaluation even if a reload lands meanwhile.
    let config = state.config.snapshot().await;
    let outcome = state.evaluator.evaluate(&request, &config).await;
    respond(outcome)
}

fn outcome_code(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Pass => "OK",
        Outcome::Fail(rule) => match rule {
            Rule::Uploader => "UPLOADER_NOT_ALLOWED",
            Rule::RecordLabel => "LABEL_NOT_ALLOWED",
            Rule::Size => "SIZE_NOT_ALLOWED",
            Rule::Ratio => "RATIO_NOT_ALLOWED",
        },
        Outcome::InputError(_) => "BAD_REQUEST",
        Outcome::UpstreamFailure(_) => "UPSTREAM_FAILURE",
    }
}

/// Map an outcome onto its status code and body.
pub fn respond(outcome: Outcome) -> Response {
    let status =
        StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = HookResponse {
        allowed: outcome.is_pass(),
        reason: outcome.reason(),
        code: outcome_code(&outcome),
    };
    (status, Json(body)).into_response()
}
