mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use rust_decimal::Decimal;
use tower::ServiceExt;

use common::{get_page, login_as_admin, spawn_app};
use storekeep::models::product::ProductDraft;
use storekeep::web::AppState;

async fn seed_order(state: &AppState, status: &str) -> i32 {
    let customer = state
        .store()
        .create_customer("kai", "kai@example.com")
        .await
        .unwrap();

    let product = state
        .store()
        .add_product(&ProductDraft {
            name: "Mug".to_string(),
            current_price: Decimal::new(999, 2),
            previous_price: None,
            in_stock: true,
            flash_sale: false,
            picture: None,
        })
        .await
        .unwrap();

    let order = state
        .store()
        .create_order(
            customer.id,
            status,
            &[(product.id, 2, Decimal::new(999, 2))],
        )
        .await
        .unwrap();

    order.id
}

async fn post_status(
    app: &axum::Router,
    cookie: &str,
    order_id: i32,
    status: &str,
) -> axum::response::Response {
    let encoded: String = status
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/update-order/{order_id}"))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("status={encoded}")))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn order_list_shows_customer_and_item_count() {
    let (app, state, _media) = spawn_app().await;
    let order_id = seed_order(&state, "pending").await;

    let cookie = login_as_admin(&app).await;
    let (status, body) = get_page(&app, &cookie, "/view-orders").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("kai@example.com"));
    assert!(body.contains("pending"));
    assert!(body.contains(&format!("/update-order/{order_id}")));
}

#[tokio::test]
async fn status_form_prefills_current_value() {
    let (app, state, _media) = spawn_app().await;
    let order_id = seed_order(&state, "accepted").await;

    let cookie = login_as_admin(&app).await;
    let (status, body) = get_page(&app, &cookie, &format!("/update-order/{order_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<option value=\"accepted\" selected>"));
}

#[tokio::test]
async fn status_update_overwrites_only_the_status() {
    let (app, state, _media) = spawn_app().await;
    let order_id = seed_order(&state, "pending").await;
    let before = state.store().get_order(order_id).await.unwrap().unwrap();

    let cookie = login_as_admin(&app).await;
    let response = post_status(&app, &cookie, order_id, "delivered").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/view-orders"
    );

    let after = state.store().get_order(order_id).await.unwrap().unwrap();
    assert_eq!(after.status, "delivered");
    assert_eq!(after.customer_id, before.customer_id);
    assert_eq!(after.created_at, before.created_at);

    let (_, body) = get_page(&app, &cookie, "/view-orders").await;
    assert!(body.contains(&format!("Order {order_id} updated successfully")));
}

#[tokio::test]
async fn arbitrary_status_strings_round_trip_verbatim() {
    let (app, state, _media) = spawn_app().await;
    let order_id = seed_order(&state, "pending").await;

    let cookie = login_as_admin(&app).await;
    let response = post_status(&app, &cookie, order_id, "definitely not a status").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let order = state.store().get_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, "definitely not a status");
}

#[tokio::test]
async fn update_of_missing_order_is_not_found() {
    let (app, _state, _media) = spawn_app().await;
    let cookie = login_as_admin(&app).await;

    let (status, _) = get_page(&app, &cookie, "/update-order/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = post_status(&app, &cookie, 999, "delivered").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
