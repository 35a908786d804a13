//! Backend DTOs.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. Deserializing into these
//! types is the shape check at the boundary: a 2xx body that does not fit
//! surfaces as `ClientError::Deserialization` instead of flowing on untyped.
//! The mock server defines its own copies so integration tests catch drift.

use serde::{Deserialize, Serialize};

/// Payload for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    /// `STANDARD`, `ADMIN`, or whatever else the backend grows.
    pub user_type: String,
}

/// Returned by both register and login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_response: UserResponse,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub location_id: String,
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: String,
    pub event_name: String,
    pub event_difficulty: String,
    pub exercise_type: String,
    pub description: String,
    pub price: f64,
    pub member_price: f64,
    /// ISO-8601 timestamp.
    pub start_time: String,
    pub end_time: String,
    pub creator: UserResponse,
    pub location: LocationResponse,
}

/// One page of `GET /api/events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventsPageResponse {
    pub data: Vec<EventResponse>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

/// Payload for `POST /api/events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub event_name: String,
    pub event_difficulty: String,
    pub exercise_type: String,
    pub description: String,
    pub price: f64,
    // The backend spells this one in lowercase.
    #[serde(rename = "membersprice")]
    pub members_price: f64,
    pub start_time: String,
    pub end_time: String,
    /// Free-text address; the backend resolves it to a location.
    pub place: String,
}
