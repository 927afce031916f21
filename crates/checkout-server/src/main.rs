//! checkout HTTP Server
//!
//! Axum server hosting the WASM checkout page and the configuration it
//! bootstraps the payment SDK with.

mod handlers;
mod state;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::CheckoutConfig;

use crate::handlers::{checkout_config, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = CheckoutConfig::from_env();
    config.validate()?;

    if config.sdk.client_id == CheckoutConfig::default().sdk.client_id {
        tracing::warn!("⚠ PAYPAL_CLIENT_ID not set - using the sandbox client");
    }
    tracing::info!(
        currency = %config.sdk.currency,
        intent = %config.sdk.intent,
        components = %config.sdk.components.join(","),
        probe_mode = ?config.probe_mode,
        "✓ Checkout configured"
    );

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());
    let state = AppState::new(config, static_dir);
    let app = router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - Health check");
    tracing::info!("  GET  /api/checkout/config - SDK bootstrap configuration");
    tracing::info!("  GET  /                    - Checkout page");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/checkout/config", get(checkout_config))
        // Static files (WASM frontend)
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
