//! Error taxonomy of the request pipelines and its HTTP mapping

use crate::models::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hello_sparql_core::SerializationFormat;
use hello_sparql_sparql::SparqlError;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Which input graph failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphRole {
    Data,
    Shapes,
}

impl fmt::Display for GraphRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphRole::Data => f.write_str("Invalid RDF data"),
            GraphRole::Shapes => f.write_str("Invalid SHACL shapes"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unsupported media type {0}")]
    UnsupportedContentType(String),

    #[error("Unsupported media type in accept header: {0}")]
    UnsupportedAcceptHeader(String),

    #[error("{role}: {message}")]
    InvalidRdfData { role: GraphRole, message: String },

    #[error("Error running inference: {0}")]
    InferenceError(String),

    #[error("Invalid SPARQL query: {0}")]
    InvalidQuery(String),

    #[error("Only SELECT and ASK queries are supported, got {0}")]
    UnsupportedQueryForm(&'static str),

    #[error("Error running SPARQL query: {0}")]
    QueryExecutionError(String),

    #[error("Error serializing results as {format}: {message}")]
    SerializationError {
        format: SerializationFormat,
        message: String,
    },

    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable name of the failure class, sent as `error` in the body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::UnsupportedContentType(_) => "UnsupportedContentType",
            ApiError::UnsupportedAcceptHeader(_) => "UnsupportedAcceptHeader",
            ApiError::InvalidRdfData { .. } => "InvalidRdfData",
            ApiError::InferenceError(_) => "InferenceError",
            ApiError::InvalidQuery(_) => "InvalidQuery",
            ApiError::UnsupportedQueryForm(_) => "UnsupportedQueryForm",
            ApiError::QueryExecutionError(_) => "QueryExecutionError",
            ApiError::SerializationError { .. } => "SerializationError",
            ApiError::InvalidRequestBody(_) => "InvalidRequestBody",
            ApiError::Internal(_) => "Internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::UnsupportedAcceptHeader(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::UnsupportedQueryForm(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::InvalidRequestBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRdfData { .. }
            | ApiError::InferenceError(_)
            | ApiError::InvalidQuery(_)
            | ApiError::QueryExecutionError(_)
            | ApiError::SerializationError { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<SparqlError> for ApiError {
    fn from(e: SparqlError) -> Self {
        match e {
            SparqlError::InvalidQuery(message) => ApiError::InvalidQuery(message),
            SparqlError::UnsupportedQueryForm(form) => ApiError::UnsupportedQueryForm(form),
            SparqlError::Execution(message) => ApiError::QueryExecutionError(message),
            SparqlError::Serialization { format, message } => ApiError::SerializationError { format, message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            warn!(kind = self.kind(), status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::UnsupportedContentType("text/plain".into()), 415),
            (ApiError::UnsupportedAcceptHeader("image/png".into()), 406),
            (
                ApiError::InvalidRdfData {
                    role: GraphRole::Shapes,
                    message: "bad".into(),
                },
                400,
            ),
            (ApiError::InferenceError("loop".into()), 400),
            (ApiError::InvalidQuery("eof".into()), 400),
            (ApiError::UnsupportedQueryForm("CONSTRUCT"), 501),
            (ApiError::QueryExecutionError("boom".into()), 400),
            (
                ApiError::SerializationError {
                    format: SerializationFormat::Turtle,
                    message: "table".into(),
                },
                400,
            ),
            (ApiError::InvalidRequestBody("missing field".into()), 422),
            (ApiError::Internal("join".into()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(error.status_code().as_u16(), status, "{}", error.kind());
        }
    }

    #[test]
    fn test_role_prefixes_message() {
        let data = ApiError::InvalidRdfData {
            role: GraphRole::Data,
            message: "line 3".into(),
        };
        let shapes = ApiError::InvalidRdfData {
            role: GraphRole::Shapes,
            message: "line 3".into(),
        };
        assert_eq!(data.to_string(), "Invalid RDF data: line 3");
        assert_eq!(shapes.to_string(), "Invalid SHACL shapes: line 3");
    }

    #[test]
    fn test_sparql_errors_keep_their_class() {
        let err: ApiError = SparqlError::UnsupportedQueryForm("DESCRIBE").into();
        assert_eq!(err.status_code(), StatusCode::NOT_IMPLEMENTED);
        let err: ApiError = SparqlError::Execution("unbound".into()).into();
        assert_eq!(err.kind(), "QueryExecutionError");
    }
}
