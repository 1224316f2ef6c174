use axum::{extract::State, response::Html};
use std::sync::Arc;
use tower_sessions::Session;

use super::{AppState, WebError, flash, pages};

/// GET /customers
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let customers = state.store().list_customers().await?;
    let flash = flash::take(&session).await;
    Ok(Html(pages::customer_list(&customers, &flash)))
}
