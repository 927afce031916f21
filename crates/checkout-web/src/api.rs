//! API Client

use checkout_core::CheckoutConfig;

/// Page origin, falling back to the dev server
fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// Fetch the SDK bootstrap configuration from the backend
pub async fn fetch_config() -> Result<CheckoutConfig, String> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/checkout/config", origin()))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json::<CheckoutConfig>().await.map_err(|e| e.to_string())
    } else {
        Err(format!("Config request failed: {}", response.status()))
    }
}
