//! Payment SDK Seam
//!
//! The provider's hosted SDK is injected into the orchestrator through these
//! traits. The browser build implements them over the PayPal JS SDK; tests use
//! [`MockPaymentSdk`].
//!
//! Everything here is single-threaded: futures are `?Send` because the real
//! client lives on the browser event loop.

mod mock;

pub use mock::{MockPaymentSdk, SdkCall};

use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::funding::{FundingSource, MountPoint};
use crate::order::{Approval, CaptureDetails, OrderCreationRequest, OrderId, PaymentOutcome};
use crate::wallet::{WalletCapability, WalletConfiguration};

/// Script endpoint of the hosted SDK
pub const SDK_SCRIPT_URL: &str = "https://www.paypal.com/sdk/js";

/// Options the SDK is loaded with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkOptions {
    /// Public client identifier
    pub client_id: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Payment intent (`capture` or `authorize`)
    #[serde(default = "default_intent")]
    pub intent: String,

    /// SDK components to enable
    #[serde(default = "default_components")]
    pub components: Vec<String>,
}

fn default_currency() -> String {
    "USD".into()
}

fn default_intent() -> String {
    "capture".into()
}

fn default_components() -> Vec<String> {
    vec!["buttons".into(), "googlepay".into()]
}

impl SdkOptions {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            currency: default_currency(),
            intent: default_intent(),
            components: default_components(),
        }
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }

    /// Script URL with the options as query parameters
    pub fn script_url(&self) -> String {
        let components = self.components.join(",");
        let params = [
            ("client-id", self.client_id.as_str()),
            ("currency", self.currency.as_str()),
            ("intent", self.intent.as_str()),
            ("components", components.as_str()),
        ];
        match url::Url::parse_with_params(SDK_SCRIPT_URL, params) {
            Ok(url) => url.into(),
            // constant base never fails to parse
            Err(_) => SDK_SCRIPT_URL.to_string(),
        }
    }
}

/// What a button is being created for
#[derive(Clone, Debug)]
pub struct ButtonSpec {
    pub funding: FundingSource,
    /// Present only for the wallet source
    pub wallet: Option<Rc<WalletConfiguration>>,
}

/// The provider SDK client
#[async_trait(?Send)]
pub trait PaymentSdk {
    /// Load the SDK; resolves once it is usable
    async fn load(&self, options: &SdkOptions) -> std::result::Result<(), SdkError>;

    /// Ask the loaded SDK whether the wallet can be offered
    async fn probe_wallet_capability(&self) -> std::result::Result<WalletCapability, SdkError>;

    /// Construct (but do not render) a button wired to `callbacks`
    fn create_button(
        &self,
        spec: ButtonSpec,
        callbacks: Rc<dyn ButtonCallbacks>,
    ) -> std::result::Result<Box<dyn ButtonHandle>, SdkError>;

    /// Client name for diagnostics
    fn name(&self) -> &str;
}

/// A constructed provider button
#[async_trait(?Send)]
pub trait ButtonHandle {
    /// Provider's own eligibility predicate; must be true before `render`
    fn is_eligible(&self) -> bool;

    async fn render(&self, mount_point: &MountPoint) -> std::result::Result<(), SdkError>;

    /// Tear down the rendering and its registrations
    fn close(&self);
}

/// Order operations the SDK hands to button callbacks
#[async_trait(?Send)]
pub trait OrderActions {
    async fn create(
        &self,
        request: &OrderCreationRequest,
    ) -> std::result::Result<OrderId, SdkError>;

    async fn capture(&self) -> std::result::Result<CaptureDetails, SdkError>;
}

/// Callbacks a button invokes while the shopper pays
#[async_trait(?Send)]
pub trait ButtonCallbacks {
    async fn create_order(&self, actions: &dyn OrderActions) -> Result<OrderId>;

    async fn on_approve(
        &self,
        approval: &Approval,
        actions: &dyn OrderActions,
    ) -> Result<PaymentOutcome>;

    fn on_error(&self, error: SdkError);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_url() {
        let options = SdkOptions::new("AWgLEpzQ-en_0tf");
        assert_eq!(
            options.script_url(),
            "https://www.paypal.com/sdk/js?client-id=AWgLEpzQ-en_0tf&currency=USD&intent=capture&components=buttons%2Cgooglepay"
        );
        assert!(options.has_component("googlepay"));
    }

    #[test]
    fn test_options_defaults_from_json() {
        let options: SdkOptions = serde_json::from_str(r#"{"client_id":"sb"}"#).unwrap();
        assert_eq!(options, SdkOptions::new("sb"));
    }
}
