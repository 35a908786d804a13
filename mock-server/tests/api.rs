use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, AuthResponse, EventResponse, EventsPageResponse};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn authed_request(uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(body.to_string())
        .unwrap()
}

const ANNA: &str = r#"{"email":"anna@example.se","username":"anna","name":"Anna","password":"hunter2"}"#;

const CROSSFIT: &str = r#"{
    "eventName": "Crossfit at Fysiken",
    "eventDifficulty": "Advanced",
    "exerciseType": "Crossfit",
    "description": "WOD",
    "price": 200,
    "membersprice": 150,
    "startTime": "2025-12-12T18:00:00",
    "endTime": "2025-12-12T19:00:00",
    "place": "Göteborg"
}"#;

// --- list ---

#[tokio::test]
async fn list_events_empty() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/events").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: EventsPageResponse = body_json(resp).await;
    assert!(page.data.is_empty());
    assert_eq!(page.total_items, 0);
}

// --- register ---

#[tokio::test]
async fn register_returns_201_with_token() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/register", ANNA))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let auth: AuthResponse = body_json(resp).await;
    assert_eq!(auth.user_response.username, "anna");
    assert_eq!(auth.user_response.user_type, "STANDARD");
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn register_blank_username_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            r#"{"email":"x","username":" ","name":"x","password":"pw"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn register_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/register", r#"{"username":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- login ---

#[tokio::test]
async fn login_unknown_user_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"ghost","password":"pw"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");
}

// --- create ---

#[tokio::test]
async fn create_event_without_token_returns_plain_401() {
    let resp = app()
        .oneshot(json_request("POST", "/api/events", CROSSFIT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(resp).await, "Unauthorized");
}

#[tokio::test]
async fn create_event_unknown_token_returns_401() {
    let resp = app()
        .oneshot(authed_request("/api/events", "not-a-token", CROSSFIT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- full lifecycle ---

#[tokio::test]
async fn register_login_create_list() {
    use tower::Service;

    let mut app = app().into_service();

    // register
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/auth/register", ANNA))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // register again: same username
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/auth/register", ANNA))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Username already taken");

    // login with the wrong password
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"anna","password":"wrong"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // login
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"anna","password":"hunter2"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let auth: AuthResponse = body_json(resp).await;
    let token = auth.access_token;

    // negative price is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_request(
            "/api/events",
            &token,
            &CROSSFIT.replace("\"price\": 200", "\"price\": -1"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed_request("/api/events", &token, CROSSFIT))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: EventResponse = body_json(resp).await;
    assert_eq!(created.event_name, "Crossfit at Fysiken");
    assert_eq!(created.member_price, 150.0);
    assert_eq!(created.creator.username, "anna");
    assert_eq!(created.location.formatted_address, "Göteborg");

    // list contains the event
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/api/events").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: EventsPageResponse = body_json(resp).await;
    assert_eq!(page.total_items, 1);
    assert_eq!(page.data[0].event_id, created.event_id);
}
