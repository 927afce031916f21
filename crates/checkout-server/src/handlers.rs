//! HTTP Handlers

use axum::{extract::State, Json};
use serde::Serialize;

use checkout_core::CheckoutConfig;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// SDK bootstrap configuration for the checkout page
pub async fn checkout_config(State(state): State<AppState>) -> Json<CheckoutConfig> {
    tracing::debug!(client_id = %state.config.sdk.client_id, "serving checkout config");
    Json(state.config.as_ref().clone())
}
