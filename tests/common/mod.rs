#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use storekeep::config::Config;
use storekeep::web::AppState;

/// Credentials seeded by the users migration
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

pub const BOUNDARY: &str = "storekeep-test-boundary";

/// Router against an in-memory database and a throwaway media directory.
/// Keep the `TempDir` alive for the duration of the test.
pub async fn spawn_app() -> (Router, Arc<AppState>, TempDir) {
    let media_dir = tempfile::tempdir().expect("Failed to create media dir");

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection so every query sees the same in-memory db
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.media.media_path = media_dir.path().to_string_lossy().into_owned();

    let state = storekeep::web::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = storekeep::web::router(state.clone()).await;

    (app, state, media_dir)
}

/// Log in through the real login route and hand back the session cookie.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub async fn login_as_admin(app: &Router) -> String {
    login(app, ADMIN_USER, ADMIN_PASSWORD).await
}

/// Multipart body for the product form. `picture` is (filename, bytes).
pub fn product_form_body(
    fields: &[(&str, &str)],
    picture: Option<(&str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = picture {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"picture\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// GET a path with the given session cookie and return (status, body text).
pub async fn get_page(app: &Router, cookie: &str, path: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = body_text(response).await;
    (status, body)
}

pub async fn body_text(response: axum::response::Response) -> String {
    use http_body_util::BodyExt;

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}
