use axum::{
    Form,
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{AppState, WebError, flash, pages};
use crate::web::flash::FlashMessage;

pub const SESSION_USER_KEY: &str = "user";

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Gate in front of every admin route. Anything short of a logged-in admin
/// account gets the stock 404 page, so the panel's routes are
/// indistinguishable from routes that do not exist.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let Ok(Some(username)) = session.get::<String>(SESSION_USER_KEY).await else {
        return WebError::NotFound.into_response();
    };

    match state.store().get_user_by_username(&username).await {
        Ok(Some(user)) if user.is_admin => {
            tracing::Span::current().record("user_id", &username);
            next.run(request).await
        }
        Ok(_) => WebError::NotFound.into_response(),
        Err(err) => {
            tracing::error!("Admin gate lookup failed: {err}");
            WebError::Internal(err.to_string()).into_response()
        }
    }
}

/// GET /login
pub async fn login_form(session: Session) -> Html<String> {
    let flash = flash::take(&session).await;
    Html(pages::login(&flash))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginForm>,
) -> Response {
    if payload.username.is_empty() || payload.password.is_empty() {
        flash::push(
            &session,
            FlashMessage::danger("Username and password are required"),
        )
        .await;
        return Redirect::to("/login").into_response();
    }

    let is_valid = match state
        .store()
        .verify_user_password(&payload.username, &payload.password)
        .await
    {
        Ok(is_valid) => is_valid,
        Err(err) => {
            tracing::error!("Login verification failed: {err}");
            flash::push(&session, FlashMessage::danger(err.user_message())).await;
            return Redirect::to("/login").into_response();
        }
    };

    if !is_valid {
        flash::push(&session, FlashMessage::danger("Invalid credentials")).await;
        return Redirect::to("/login").into_response();
    }

    if let Err(err) = session.insert(SESSION_USER_KEY, &payload.username).await {
        tracing::error!("Failed to create session: {err}");
        return WebError::Internal(err.to_string()).into_response();
    }

    tracing::info!("User logged in: {}", payload.username);
    Redirect::to("/admin-page").into_response()
}

/// POST /logout
pub async fn logout(session: Session) -> Redirect {
    let _ = session.flush().await;
    Redirect::to("/login")
}
