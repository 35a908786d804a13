//! Async API client core for the training-buddy backend.
//!
//! # Overview
//! A JSON fetch wrapper with typed error normalisation, a bearer-token
//! wrapper on top of it, backend DTOs, a pure event filter, and an explicit
//! session value with file persistence.
//!
//! # Design
//! - `ApiClient` holds only `base_url` and a `Transport`; every call builds
//!   an `HttpRequest`, executes it once, and parses the `HttpResponse`.
//! - Non-2xx replies become `ApiError { message, status, body }`. Transport
//!   failures are a separate `ClientError` variant.
//! - Nothing retries, times out or caches.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, ErrorBody, TransportError};
pub use filter::{filter_events, matches, Difficulty, DifficultyFilter, FilterCriteria, ListableEvent};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use session::{Session, SessionError, SessionStore, User};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    AuthResponse, EventRequest, EventResponse, EventsPageResponse, LocationResponse, LoginRequest,
    RegisterRequest, UserResponse,
};
