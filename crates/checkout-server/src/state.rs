//! Application State

use std::path::PathBuf;
use std::sync::Arc;

use checkout_core::CheckoutConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SDK bootstrap configuration handed to the page
    pub config: Arc<CheckoutConfig>,

    /// Directory holding the built WASM bundle
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(config: CheckoutConfig, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(config),
            static_dir: static_dir.into(),
        }
    }
}
