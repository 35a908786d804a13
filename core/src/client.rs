//! JSON request wrappers for the training-buddy backend.
//!
//! # Design
//! `ApiClient` holds a `base_url` and a `Transport` and carries no mutable
//! state between calls. Each call is split into building an `HttpRequest`,
//! one `Transport::execute`, and parsing the `HttpResponse`. The build and
//! parse halves are public and pure so they can be tested without I/O.
//!
//! The authenticated wrapper checks the token while building, so a missing
//! token fails before the transport is ever touched.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::http::{HttpRequest, HttpResponse, RequestOptions};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{AuthResponse, EventRequest, EventResponse, EventsPageResponse, LoginRequest, RegisterRequest};

const JSON: &str = "application/json";

/// Client for the backend's JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, ReqwestTransport::new())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        HttpRequest {
            method: options.method,
            url: format!("{}{path}", self.base_url),
            headers: options.headers,
            body: options.body,
        }
    }

    /// Like `build_request`, but requires a bearer token.
    ///
    /// `Authorization` and `Content-Type` override caller headers of the same
    /// name; other caller headers are kept.
    pub fn build_authenticated_request(
        &self,
        path: &str,
        token: Option<&str>,
        mut options: RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let token = token.filter(|t| !t.is_empty()).ok_or_else(ApiError::missing_token)?;
        options.set_header("Authorization", &format!("Bearer {token}"));
        options.set_header("Content-Type", JSON);
        Ok(self.build_request(path, options))
    }

    pub fn parse_json<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ClientError> {
        if !response.is_success() {
            let err = ApiError::from_response(&response);
            warn!(status = err.status, "request failed");
            return Err(err.into());
        }
        serde_json::from_str(&response.body).map_err(|e| ClientError::Deserialization(e.to_string()))
    }

    /// Issue `options` against `base_url + path` and decode the JSON reply.
    pub async fn fetch_json<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, ClientError> {
        let request = self.build_request(path, options);
        self.send(request).await
    }

    /// `fetch_json` with a bearer token. Fails locally with a 401 when the
    /// token is missing or empty.
    pub async fn auth_fetch_json<R: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        options: RequestOptions,
    ) -> Result<R, ClientError> {
        let request = self.build_authenticated_request(path, token, options)?;
        self.send(request).await
    }

    pub async fn register(&self, input: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let options = RequestOptions::post_json(input)?.with_header("Content-Type", JSON);
        self.fetch_json("/api/auth/register", options).await
    }

    pub async fn login(&self, input: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let options = RequestOptions::post_json(input)?.with_header("Content-Type", JSON);
        self.fetch_json("/api/auth/login", options).await
    }

    pub async fn list_events(&self) -> Result<EventsPageResponse, ClientError> {
        self.fetch_json("/api/events", RequestOptions::get()).await
    }

    pub async fn create_event(
        &self,
        input: &EventRequest,
        token: Option<&str>,
    ) -> Result<EventResponse, ClientError> {
        let options = RequestOptions::post_json(input)?;
        self.auth_fetch_json("/api/events", token, options).await
    }

    async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
        let response = self.transport.execute(request).await?;
        self.parse_json(response)
    }
}
