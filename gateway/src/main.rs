use anyhow::Result;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corridor_sites::Catalogue;

mod config;
mod routes;

use config::GatewayConfig;

/// Shared across requests. The catalogue is never written after start-up,
/// so readers need no locking.
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<Catalogue>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();

    let catalogue = config
        .load_catalogue()
        .map_err(|err| config.catalogue_error(err))?;
    match &config.catalogue_path {
        Some(path) => tracing::info!("   Catalogue loaded from {}", path.display()),
        None => tracing::info!("   Using built-in corridor catalogue"),
    }
    for corridor in catalogue.corridors() {
        tracing::info!("   {}: {} sites", corridor.name(), corridor.sites().len());
    }

    let state = AppState {
        catalogue: Arc::new(catalogue),
    };

    let api_routes = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Static dashboard (if present)
    let app = if config.ui_path.exists() {
        tracing::info!("   Serving dashboard from {}", config.ui_path.display());
        api_routes.fallback_service(ServeDir::new(&config.ui_path))
    } else {
        tracing::warn!(
            "   Dashboard not found at {} - API only",
            config.ui_path.display()
        );
        api_routes
    };

    let addr = config.addr();
    tracing::info!("EV Corridor Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
