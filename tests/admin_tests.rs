mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use common::{get_page, login, login_as_admin, spawn_app};
use storekeep::config::SecurityConfig;

const ADMIN_PATHS: &[&str] = &[
    "/admin-page",
    "/shop-items",
    "/add-shop-items",
    "/update-item/1",
    "/view-orders",
    "/update-order/1",
    "/customers",
    "/metrics",
];

#[tokio::test]
async fn admin_routes_are_not_found_for_anonymous() {
    let (app, _state, _media) = spawn_app().await;

    for path in ADMIN_PATHS {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(*path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path}");
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/delete-item/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_routes_are_not_found_for_non_admin_accounts() {
    let (app, state, _media) = spawn_app().await;

    state
        .store()
        .create_user("clerk", "clerk-password", false, &SecurityConfig::default())
        .await
        .expect("Failed to create clerk");

    let cookie = login(&app, "clerk", "clerk-password").await;

    for path in ADMIN_PATHS {
        let (status, body) = get_page(&app, &cookie, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
        assert!(body.contains("does not exist"), "path {path}");
    }
}

#[tokio::test]
async fn wrong_password_leaves_actor_ungated() {
    let (app, _state, _media) = spawn_app().await;

    let body = "username=admin&password=wrong";
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
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login"
    );

    // The failed login still created a session (for the flash message); the
    // gate must not honor it.
    if let Some(cookie) = response.headers().get(header::SET_COOKIE) {
        let cookie = cookie.to_str().unwrap().split(';').next().unwrap().to_string();
        let (status, _) = get_page(&app, &cookie, "/admin-page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // The flash shows up on the login page instead
        let (status, body) = get_page(&app, &cookie, "/login").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Invalid credentials"));
    }
}

#[tokio::test]
async fn store_answers_ping() {
    let (_app, state, _media) = spawn_app().await;
    state.store().ping().await.unwrap();
}

#[tokio::test]
async fn admin_reaches_landing_page() {
    let (app, _state, _media) = spawn_app().await;
    let cookie = login_as_admin(&app).await;

    let (status, body) = get_page(&app, &cookie, "/admin-page").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Manage shop items"));
}

#[tokio::test]
async fn logout_revokes_access() {
    let (app, _state, _media) = spawn_app().await;
    let cookie = login_as_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, _) = get_page(&app, &cookie, "/admin-page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customers_page_lists_every_customer() {
    let (app, state, _media) = spawn_app().await;

    state
        .store()
        .create_customer("kai", "kai@example.com")
        .await
        .unwrap();
    state
        .store()
        .create_customer("ren", "ren@example.com")
        .await
        .unwrap();

    let cookie = login_as_admin(&app).await;
    let (status, body) = get_page(&app, &cookie, "/customers").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("kai@example.com"));
    assert!(body.contains("ren@example.com"));
}

#[tokio::test]
async fn unmatched_routes_render_the_same_not_found_page() {
    let (app, _state, _media) = spawn_app().await;
    let cookie = login_as_admin(&app).await;

    let (gated_status, gated_body) = {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/view-orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        (response.status(), common::body_text(response).await)
    };

    let (missing_status, missing_body) = get_page(&app, &cookie, "/no-such-page").await;

    assert_eq!(gated_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(gated_body, missing_body);
}
