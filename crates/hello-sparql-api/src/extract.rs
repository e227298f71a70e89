//! Request extractors
//!
//! Handlers list them in check order: [`RequireJson`] (415), [`Negotiated`]
//! (406), then [`JsonBody`] (422).

use crate::error::ApiError;
use crate::negotiation::{negotiate, NegotiatedFormat};
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use serde::de::DeserializeOwned;

fn header_text(value: Option<&HeaderValue>) -> Option<String> {
    value.map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// Rejects requests whose `Content-Type` does not mention `application/json`
#[derive(Debug, Clone, Copy)]
pub struct RequireJson;

#[async_trait]
impl<S> FromRequestParts<S> for RequireJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header_text(parts.headers.get(CONTENT_TYPE)) {
            Some(content_type) if content_type.contains("application/json") => Ok(RequireJson),
            Some(content_type) => Err(ApiError::UnsupportedContentType(content_type)),
            None => Err(ApiError::UnsupportedContentType("none".to_string())),
        }
    }
}

/// Response format negotiated from the `Accept` header
#[derive(Debug, Clone, Copy)]
pub struct Negotiated(pub NegotiatedFormat);

#[async_trait]
impl<S> FromRequestParts<S> for Negotiated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = header_text(parts.headers.get(ACCEPT));
        negotiate(accept.as_deref()).map(Negotiated)
    }
}

/// JSON request body; decoding failures are `InvalidRequestBody`
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidRequestBody(e.body_text()))?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::InvalidRequestBody(e.to_string()))
    }
}
