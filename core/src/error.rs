//! Error types for the API client.
//!
//! # Design
//! Every non-2xx response becomes an `ApiError` carrying the status and the
//! best-effort parsed body, so callers can branch on both. Failures where no
//! response was obtained are kept apart in `ClientError::Transport`; they
//! travel through the same `Result` but never pretend to have a status.

use thiserror::Error;

use crate::http::HttpResponse;

/// Response body attached to an `ApiError`.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// No body, or a local failure that never reached the server.
    Empty,
    Json(serde_json::Value),
    /// The body was not valid JSON; kept verbatim.
    Text(String),
}

impl ErrorBody {
    /// Parse `raw` as JSON, falling back to the raw text.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return ErrorBody::Empty;
        }
        match serde_json::from_str(raw) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(raw.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// A backend call that did not succeed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, body: ErrorBody) -> Self {
        Self {
            message: message.into(),
            status,
            body,
        }
    }

    /// Local 401 raised before any network activity.
    pub fn missing_token() -> Self {
        Self::new("Missing access token", 401, ErrorBody::Empty)
    }

    pub fn from_response(response: &HttpResponse) -> Self {
        Self::new(
            format!("Request failed ({})", response.status),
            response.status,
            ErrorBody::parse(&response.body),
        )
    }

    /// Message suitable for showing to a user: the body's `message`, then its
    /// `error`, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let from_body = self.body.as_json().and_then(|body| {
            ["message", "error"]
                .iter()
                .find_map(|key| body.get(*key).and_then(|v| v.as_str()).filter(|s| !s.is_empty()))
        });
        from_body.unwrap_or(fallback).to_string()
    }
}

/// The transport produced no response (connection refused, DNS, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors returned by `ApiClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}
