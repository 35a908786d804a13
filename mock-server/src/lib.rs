use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub user_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_response: UserResponse,
    pub access_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub location_id: String,
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: String,
    pub event_name: String,
    pub event_difficulty: String,
    pub exercise_type: String,
    pub description: String,
    pub price: f64,
    pub member_price: f64,
    pub start_time: String,
    pub end_time: String,
    pub creator: UserResponse,
    pub location: LocationResponse,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPageResponse {
    pub data: Vec<EventResponse>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub event_name: String,
    pub event_difficulty: String,
    pub exercise_type: String,
    pub description: String,
    pub price: f64,
    pub membersprice: f64,
    pub start_time: String,
    pub end_time: String,
    pub place: String,
}

struct Account {
    user: UserResponse,
    password: String,
}

#[derive(Default)]
pub struct Backend {
    accounts: HashMap<String, Account>,
    /// access token -> username
    tokens: HashMap<String, String>,
    events: Vec<EventResponse>,
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/events", get(list_events).post(create_event))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn issue_token(backend: &mut Backend, username: &str) -> String {
    let token = Uuid::new_v4().to_string();
    backend.tokens.insert(token.clone(), username.to_string());
    token
}

async fn register(State(db): State<Db>, Json(input): Json<RegisterRequest>) -> Response {
    if input.username.trim().is_empty() || input.password.is_empty() {
        return message(StatusCode::BAD_REQUEST, "Username and password are required");
    }

    let mut backend = db.write().await;
    if backend.accounts.contains_key(&input.username) {
        return message(StatusCode::CONFLICT, "Username already taken");
    }

    let user = UserResponse {
        user_id: Uuid::new_v4().to_string(),
        email: input.email,
        username: input.username.clone(),
        name: input.name,
        user_type: "STANDARD".to_string(),
    };
    backend.accounts.insert(
        input.username.clone(),
        Account {
            user: user.clone(),
            password: input.password,
        },
    );
    let access_token = issue_token(&mut backend, &input.username);
    info!(username = %input.username, "registered");

    let body = AuthResponse {
        user_response: user,
        access_token,
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Response {
    let mut backend = db.write().await;
    let user = match backend.accounts.get(&input.username) {
        Some(account) if account.password == input.password => account.user.clone(),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response()
        }
    };
    let access_token = issue_token(&mut backend, &input.username);

    Json(AuthResponse {
        user_response: user,
        access_token,
    })
    .into_response()
}

async fn list_events(State(db): State<Db>) -> Json<EventsPageResponse> {
    let backend = db.read().await;
    let total = backend.events.len();
    Json(EventsPageResponse {
        data: backend.events.clone(),
        current_page: 0,
        total_pages: 1,
        total_items: total as u64,
        page_size: total as u32,
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn create_event(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<EventRequest>,
) -> Response {
    let mut backend = db.write().await;

    let creator = bearer(&headers)
        .and_then(|token| backend.tokens.get(token))
        .and_then(|username| backend.accounts.get(username))
        .map(|account| account.user.clone());
    let Some(creator) = creator else {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    };

    if input.price < 0.0 || input.membersprice < 0.0 {
        return message(StatusCode::BAD_REQUEST, "Price must not be negative");
    }

    let event = EventResponse {
        event_id: Uuid::new_v4().to_string(),
        event_name: input.event_name,
        event_difficulty: input.event_difficulty,
        exercise_type: input.exercise_type,
        description: input.description,
        price: input.price,
        member_price: input.membersprice,
        start_time: input.start_time,
        end_time: input.end_time,
        creator,
        location: LocationResponse {
            location_id: Uuid::new_v4().to_string(),
            lat: 0.0,
            lon: 0.0,
            formatted_address: input.place,
        },
    };
    backend.events.push(event.clone());
    info!(event_id = %event.event_id, "event created");

    (StatusCode::CREATED, Json(event)).into_response()
}
