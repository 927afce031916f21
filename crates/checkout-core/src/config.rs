//! Checkout Configuration

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};
use crate::sdk::SdkOptions;

/// How the wallet probe result is judged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Available only when the configuration lists an allowed payment method
    #[default]
    AllowedMethods,
    /// Available as soon as the SDK exposes the wallet component
    CapabilityOnly,
}

impl ProbeMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "allowed_methods" | "allowed-methods" => Some(Self::AllowedMethods),
            "capability_only" | "capability-only" => Some(Self::CapabilityOnly),
            _ => None,
        }
    }
}

/// Everything the page needs to bootstrap the SDK
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub sdk: SdkOptions,
    #[serde(default)]
    pub probe_mode: ProbeMode,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            sdk: SdkOptions::new("sb"),
            probe_mode: ProbeMode::default(),
        }
    }
}

impl CheckoutConfig {
    pub fn new(sdk: SdkOptions) -> Self {
        Self {
            sdk,
            probe_mode: ProbeMode::default(),
        }
    }

    /// Read from `PAYPAL_CLIENT_ID`, `CHECKOUT_CURRENCY`, `CHECKOUT_INTENT`,
    /// `CHECKOUT_COMPONENTS` and `WALLET_PROBE_MODE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let client_id = lookup("PAYPAL_CLIENT_ID").unwrap_or(defaults.sdk.client_id);
        let currency = lookup("CHECKOUT_CURRENCY")
            .map(|c| c.to_uppercase())
            .unwrap_or(defaults.sdk.currency);
        let intent = lookup("CHECKOUT_INTENT")
            .map(|i| i.to_lowercase())
            .unwrap_or(defaults.sdk.intent);
        let components = lookup("CHECKOUT_COMPONENTS")
            .map(|c| {
                c.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.sdk.components);
        let probe_mode = lookup("WALLET_PROBE_MODE")
            .and_then(|m| ProbeMode::from_str(&m))
            .unwrap_or_default();

        Self {
            sdk: SdkOptions {
                client_id,
                currency,
                intent,
                components,
            },
            probe_mode,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sdk.client_id.trim().is_empty() {
            return Err(CheckoutError::Config("client id is empty".into()));
        }
        let currency = &self.sdk.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CheckoutError::Config(format!(
                "currency must be a three-letter ISO code, got {:?}",
                self.sdk.currency
            )));
        }
        if !matches!(self.sdk.intent.as_str(), "capture" | "authorize") {
            return Err(CheckoutError::Config(format!("unsupported intent {:?}", self.sdk.intent)));
        }
        if !self.sdk.has_component("buttons") {
            return Err(CheckoutError::Config("the buttons component is required".into()));
        }
        if !self.sdk.has_component("googlepay") {
            tracing::warn!("googlepay component not enabled; wallet will be unavailable");
        }
        Ok(())
    }
}
