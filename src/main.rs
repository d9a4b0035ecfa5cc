use anyhow::Result;
use std::sync::Arc;

mod config;
mod error;
mod logging;
mod routes;
mod services;
pub mod models;

use services::faq::{Catalog, FaqSearch};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;

    let catalog = Catalog::load(config.faq_catalog_path.as_deref())?;
    let faq = FaqSearch::new(catalog, config.search_cache_size);

    let addr = config.bind_addr;
    let state = Arc::new(AppState::new(config, faq));
    let app = routes::app(state);

    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state
pub struct AppState {
    config: config::Config,
    faq: FaqSearch,
}

impl AppState {
    fn new(config: config::Config, faq: FaqSearch) -> Self {
        Self { config, faq }
    }
}
