//! API request and response models

use serde::{Deserialize, Serialize};

/// `POST /sparql` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlRequest {
    pub data: String,
    pub query: String,
    #[serde(default)]
    pub inference: bool,
}

/// `POST /shacl` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaclRequest {
    pub data: String,
    pub shapes: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Serialized pipeline result ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub body: String,
    pub media_type: &'static str,
    pub count: usize,
}
