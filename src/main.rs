use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bookdesk::config::AppConfig;
use bookdesk::db::{self, BookingRepository};
use bookdesk::handlers;
use bookdesk::models::Catalog;
use bookdesk::services::calendar::CalendarMirror;
use bookdesk::services::desk::BookingDesk;
use bookdesk::services::manager::BookingManager;
use bookdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!("loading catalog from {path}");
            Catalog::load(path)?
        }
        None => Catalog::default(),
    };

    let store = db::open_store(&config)?;
    let manager = BookingManager::new(BookingRepository::new(store), catalog)
        .with_enforcement(config.enforce_availability);

    let mirror = CalendarMirror::from_config(&config.calendar, &manager.catalog().currency_symbol)
        .context("invalid calendar configuration")?;
    if mirror.is_some() {
        tracing::info!("calendar sync enabled (timezone: {})", config.calendar.timezone);
    } else {
        tracing::info!("calendar sync disabled");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        desk: BookingDesk::new(manager, mirror),
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.bind_addr, config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
