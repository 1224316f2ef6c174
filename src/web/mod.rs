use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::db::Store;
use crate::services::MediaStore;
use crate::state::SharedState;

pub mod auth;
mod customers;
mod dashboard;
mod error;
pub mod flash;
mod observability;
mod orders;
pub mod pages;
mod products;

pub use error::WebError;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub media: MediaStore,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let media_path = shared.config.read().await.media.media_path.clone();

    Ok(Arc::new(AppState {
        shared,
        media: MediaStore::new(media_path),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (secure_cookies, session_minutes, max_upload_bytes) = {
        let config = state.config().read().await;
        (
            config.server.secure_cookies,
            config.server.session_minutes,
            config.media.max_upload_bytes,
        )
    };

    let media_path = state.media.root().to_owned();

    let admin_routes = create_admin_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(session_minutes)));

    let panel = Router::new()
        .merge(admin_routes)
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(session_layer)
        .with_state(state);

    Router::new()
        .merge(panel)
        .nest_service("/media", ServeDir::new(media_path))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::record_request))
        .layer(middleware::from_fn(observability::security_headers))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/add-shop-items",
            get(products::add_form).post(products::add_submit),
        )
        .route("/shop-items", get(products::list).post(products::list))
        .route(
            "/update-item/{id}",
            get(products::update_form).post(products::update_submit),
        )
        .route("/delete-item/{id}", post(products::delete))
        .route("/view-orders", get(orders::list))
        .route(
            "/update-order/{id}",
            get(orders::update_form).post(orders::update_submit),
        )
        .route("/customers", get(customers::list))
        .route("/admin-page", get(dashboard::admin_page))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}

/// Unmatched paths render the same page the authorization gate serves.
async fn not_found() -> axum::response::Response {
    WebError::NotFound.into_response()
}
