use axum::response::Html;
use tower_sessions::Session;

use super::{flash, pages};

/// GET /admin-page
pub async fn admin_page(session: Session) -> Html<String> {
    let flash = flash::take(&session).await;
    Html(pages::landing(&flash))
}
