//! API request handlers

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::extract::{JsonBody, Negotiated, RequireJson};
use crate::models::{HealthResponse, PipelineOutput, ShaclRequest, SparqlRequest};
use crate::pipeline::{run_shacl, run_sparql};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Row count of a query result, or result count of a validation report
pub const X_RESULT_COUNT: HeaderName = HeaderName::from_static("x-result-count");

/// Shared application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Health check handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}

/// SPARQL query handler
pub async fn sparql(
    State(state): State<AppState>,
    _json: RequireJson,
    Negotiated(negotiated): Negotiated,
    JsonBody(request): JsonBody<SparqlRequest>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let inference = request.inference;
    let reasoner = state.config.reasoner.clone();

    let output = blocking(move || run_sparql(&request, negotiated, &reasoner)).await?;

    info!(
        format = %negotiated.format,
        inference,
        count = output.count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "SPARQL query answered"
    );
    Ok(respond(output))
}

/// SHACL validation handler
pub async fn shacl(
    _json: RequireJson,
    Negotiated(negotiated): Negotiated,
    JsonBody(request): JsonBody<ShaclRequest>,
) -> Result<Response, ApiError> {
    let start = Instant::now();

    let output = blocking(move || run_shacl(&request, negotiated)).await?;

    info!(
        format = %negotiated.format,
        results = output.count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "SHACL validation finished"
    );
    Ok(respond(output))
}

async fn blocking<F>(pipeline: F) -> Result<PipelineOutput, ApiError>
where
    F: FnOnce() -> Result<PipelineOutput, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(pipeline)
        .await
        .map_err(|e| ApiError::Internal(format!("pipeline task failed: {e}")))?
}

fn respond(output: PipelineOutput) -> Response {
    (
        [
            (CONTENT_TYPE, HeaderValue::from_static(output.media_type)),
            (X_RESULT_COUNT, HeaderValue::from(output.count)),
        ],
        output.body,
    )
        .into_response()
}
