use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod faq;
pub mod sheets;

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
}

/// Every route of the service, bound to `state`.
pub fn app(state: Arc<AppState>) -> Router {
    let max_file_size = state.config.max_file_size;
    Router::new()
        .merge(sheets::routes(max_file_size))
        .merge(faq::routes())
        .with_state(state)
        .merge(routes())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
