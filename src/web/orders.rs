use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{AppState, WebError, flash, pages};
use crate::web::flash::FlashMessage;

#[derive(Deserialize)]
pub struct OrderStatusForm {
    pub status: String,
}

/// GET /view-orders
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let rows = state.store().list_orders().await?;
    let flash = flash::take(&session).await;
    Ok(Html(pages::order_list(&rows, &flash)))
}

/// GET /update-order/{id}
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Html<String>, WebError> {
    let order = state
        .store()
        .get_order(id)
        .await?
        .ok_or(WebError::NotFound)?;

    let flash = flash::take(&session).await;
    Ok(Html(pages::order_form(&order, &flash)))
}

/// POST /update-order/{id}
///
/// The status field is an open enumeration; whatever string arrives is
/// written verbatim.
pub async fn update_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Form(payload): Form<OrderStatusForm>,
) -> Result<Response, WebError> {
    let order = state
        .store()
        .get_order(id)
        .await?
        .ok_or(WebError::NotFound)?;

    match state.store().update_order_status(id, &payload.status).await {
        Ok(()) => {
            flash::push(
                &session,
                FlashMessage::success(format!("Order {id} updated successfully")),
            )
            .await;
            Ok(Redirect::to("/view-orders").into_response())
        }
        Err(crate::db::StoreError::NotFound) => Err(WebError::NotFound),
        Err(err) => {
            tracing::error!("Failed to update order {id}: {err}");
            let notice = vec![FlashMessage::danger(format!(
                "Error updating order: {}",
                err.user_message()
            ))];
            Ok((StatusCode::OK, Html(pages::order_form(&order, &notice))).into_response())
        }
    }
}
