use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use thumbboard::config::Config;
use thumbboard::db::MemoryStore;
use thumbboard::{build_router, AppState};

/// Build the full application router over a fresh in-memory store.
///
/// The static directory points nowhere so only API routes are mounted.
pub fn build_test_app() -> Router {
    let mut config = Config::default();
    config.server.static_dir = "./does-not-exist".to_string();
    build_router(AppState::new(Arc::new(MemoryStore::new()), config))
}

/// Send a request, optionally with a bearer token and a JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert the status and error envelope of a failed request.
pub async fn assert_error(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], code, "unexpected error body: {json}");
    assert!(json["error"]["message"].is_string());
}

/// Register and log in, returning the bearer token.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let creds = serde_json::json!({ "email": email, "password": "hunter2hunter2" });

    let response = send(app, Method::POST, "/register", None, Some(creds.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(app, Method::POST, "/login", None, Some(creds)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a board and return its id.
pub async fn create_board(app: &Router, token: &str, name: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/boards",
        Some(token),
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

/// Add a thumbnail and return its id.
pub async fn add_thumbnail(app: &Router, token: &str, board_id: &str, video_url: &str) -> String {
    let response = send(
        app,
        Method::POST,
        &format!("/boards/{board_id}/thumbnails"),
        Some(token),
        Some(serde_json::json!({ "video_url": video_url })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}
