//! Mock Payment SDK
//!
//! For testing and offline demos. Records every call made against it and lets
//! the caller play the shopper by approving or failing a rendered button.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;

use super::{ButtonCallbacks, ButtonHandle, ButtonSpec, OrderActions, PaymentSdk, SdkOptions};
use crate::error::{CheckoutError, Result, SdkError};
use crate::funding::{FundingSource, MountPoint};
use crate::order::{Approval, CaptureDetails, OrderCreationRequest, OrderId, PaymentOutcome};
use crate::wallet::{
    AllowedPaymentMethod, CardParameters, MerchantInfo, TokenizationSpecification,
    WalletCapability, WalletConfiguration,
};

/// A call observed by the mock, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SdkCall {
    Load,
    ProbeWallet,
    CreateButton(FundingSource),
    IsEligible(FundingSource),
    Render(FundingSource, MountPoint),
    Close(FundingSource),
    CreateOrder(FundingSource, OrderCreationRequest),
    Capture(FundingSource),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ButtonState {
    Created,
    Rendered,
    Closed,
}

struct RegisteredButton {
    funding: FundingSource,
    callbacks: Rc<dyn ButtonCallbacks>,
    state: Rc<Cell<ButtonState>>,
}

/// Mock SDK client with scripted outcomes
pub struct MockPaymentSdk {
    load_error: Option<SdkError>,
    wallet: std::result::Result<WalletCapability, SdkError>,
    ineligible: Vec<FundingSource>,
    render_errors: Vec<FundingSource>,
    order_error: Option<SdkError>,
    capture_error: Option<SdkError>,
    order_id: OrderId,
    calls: Rc<RefCell<Vec<SdkCall>>>,
    buttons: RefCell<Vec<RegisteredButton>>,
}

impl Default for MockPaymentSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentSdk {
    /// Everything loads, the wallet is configured and every button is eligible
    pub fn new() -> Self {
        Self {
            load_error: None,
            wallet: Ok(WalletCapability::Configured(Self::wallet_config())),
            ineligible: Vec::new(),
            render_errors: Vec::new(),
            order_error: None,
            capture_error: None,
            order_id: generate_order_id(),
            calls: Rc::new(RefCell::new(Vec::new())),
            buttons: RefCell::new(Vec::new()),
        }
    }

    /// A wallet configuration with one card method
    pub fn wallet_config() -> WalletConfiguration {
        WalletConfiguration {
            allowed_payment_methods: vec![AllowedPaymentMethod {
                method_type: "CARD".into(),
                parameters: CardParameters {
                    allowed_auth_methods: vec!["PAN_ONLY".into(), "CRYPTOGRAM_3DS".into()],
                    allowed_card_networks: vec!["MASTERCARD".into(), "VISA".into()],
                },
                tokenization_specification: Some(TokenizationSpecification {
                    spec_type: "PAYMENT_GATEWAY".into(),
                    parameters: [("gateway".to_string(), "paypalppcp".into())]
                        .into_iter()
                        .collect(),
                }),
            }],
            merchant_info: Some(MerchantInfo {
                merchant_id: Some("MOCKMERCHANT01".into()),
                ..Default::default()
            }),
            api_version: Some(2),
            api_version_minor: Some(0),
            country_code: Some("US".into()),
        }
    }

    #[must_use]
    pub fn with_load_failure(mut self, message: &str) -> Self {
        self.load_error = Some(SdkError::new(message));
        self
    }

    #[must_use]
    pub fn with_wallet(mut self, capability: WalletCapability) -> Self {
        self.wallet = Ok(capability);
        self
    }

    #[must_use]
    pub fn with_probe_failure(mut self, message: &str) -> Self {
        self.wallet = Err(SdkError::new(message));
        self
    }

    /// `is_eligible()` returns false for buttons of this funding source
    #[must_use]
    pub fn with_ineligible(mut self, funding: FundingSource) -> Self {
        self.ineligible.push(funding);
        self
    }

    #[must_use]
    pub fn with_render_failure(mut self, funding: FundingSource) -> Self {
        self.render_errors.push(funding);
        self
    }

    #[must_use]
    pub fn with_order_failure(mut self, message: &str) -> Self {
        self.order_error = Some(SdkError::new(message));
        self
    }

    #[must_use]
    pub fn with_capture_failure(mut self, message: &str) -> Self {
        self.capture_error = Some(SdkError::new(message));
        self
    }

    /// Order id the provider assigns on create and returns on capture
    #[must_use]
    pub fn with_order_id(mut self, id: &str) -> Self {
        self.order_id = OrderId::new(id);
        self
    }

    /// Every call so far
    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.borrow().clone()
    }

    /// Index of the first call matching `call`
    pub fn position(&self, call: &SdkCall) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == call)
    }

    pub fn count(&self, call: &SdkCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    /// Buttons created for `funding`
    pub fn created(&self, funding: FundingSource) -> usize {
        self.count(&SdkCall::CreateButton(funding))
    }

    /// Render calls issued for `funding`, successful or not
    pub fn renders(&self, funding: FundingSource) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SdkCall::Render(f, _) if *f == funding))
            .count()
    }

    /// Buttons currently rendered and not closed
    pub fn live_buttons(&self, funding: FundingSource) -> usize {
        self.buttons
            .borrow()
            .iter()
            .filter(|b| b.funding == funding && b.state.get() == ButtonState::Rendered)
            .count()
    }

    fn live_callbacks(&self, funding: FundingSource) -> Option<Rc<dyn ButtonCallbacks>> {
        self.buttons
            .borrow()
            .iter()
            .rev()
            .find(|b| b.funding == funding && b.state.get() == ButtonState::Rendered)
            .map(|b| Rc::clone(&b.callbacks))
    }

    /// Shopper clicks the rendered button and approves the payment
    pub async fn approve(&self, funding: FundingSource) -> Result<PaymentOutcome> {
        let callbacks = self.live_callbacks(funding).ok_or_else(|| CheckoutError::Render {
            funding,
            source: SdkError::new("no rendered button"),
        })?;

        let actions = MockOrderActions {
            funding,
            order_id: self.order_id.clone(),
            order_error: self.order_error.clone(),
            capture_error: self.capture_error.clone(),
            calls: Rc::clone(&self.calls),
        };

        let order_id = callbacks.create_order(&actions).await?;
        callbacks.on_approve(&Approval::new(order_id), &actions).await
    }

    /// The provider reports an error on the rendered button
    pub fn fail(&self, funding: FundingSource, message: &str) -> bool {
        match self.live_callbacks(funding) {
            Some(callbacks) => {
                callbacks.on_error(SdkError::new(message));
                true
            }
            None => false,
        }
    }

    fn record(&self, call: SdkCall) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl PaymentSdk for MockPaymentSdk {
    async fn load(&self, _options: &SdkOptions) -> std::result::Result<(), SdkError> {
        self.record(SdkCall::Load);
        match &self.load_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn probe_wallet_capability(&self) -> std::result::Result<WalletCapability, SdkError> {
        self.record(SdkCall::ProbeWallet);
        self.wallet.clone()
    }

    fn create_button(
        &self,
        spec: ButtonSpec,
        callbacks: Rc<dyn ButtonCallbacks>,
    ) -> std::result::Result<Box<dyn ButtonHandle>, SdkError> {
        self.record(SdkCall::CreateButton(spec.funding));

        let state = Rc::new(Cell::new(ButtonState::Created));
        self.buttons.borrow_mut().push(RegisteredButton {
            funding: spec.funding,
            callbacks,
            state: Rc::clone(&state),
        });

        Ok(Box::new(MockButtonHandle {
            funding: spec.funding,
            eligible: !self.ineligible.contains(&spec.funding),
            render_error: self
                .render_errors
                .contains(&spec.funding)
                .then(|| SdkError::new("render target rejected")),
            state,
            calls: Rc::clone(&self.calls),
        }))
    }

    fn name(&self) -> &str {
        "MockSdk"
    }
}

struct MockButtonHandle {
    funding: FundingSource,
    eligible: bool,
    render_error: Option<SdkError>,
    state: Rc<Cell<ButtonState>>,
    calls: Rc<RefCell<Vec<SdkCall>>>,
}

#[async_trait(?Send)]
impl ButtonHandle for MockButtonHandle {
    fn is_eligible(&self) -> bool {
        self.calls.borrow_mut().push(SdkCall::IsEligible(self.funding));
        self.eligible
    }

    async fn render(&self, mount_point: &MountPoint) -> std::result::Result<(), SdkError> {
        self.calls
            .borrow_mut()
            .push(SdkCall::Render(self.funding, mount_point.clone()));

        // Same as the hosted SDK: rendering an ineligible button is an error
        if !self.eligible {
            return Err(SdkError::new("button is not eligible"));
        }
        if let Some(err) = &self.render_error {
            return Err(err.clone());
        }
        self.state.set(ButtonState::Rendered);
        Ok(())
    }

    fn close(&self) {
        self.calls.borrow_mut().push(SdkCall::Close(self.funding));
        self.state.set(ButtonState::Closed);
    }
}

struct MockOrderActions {
    funding: FundingSource,
    order_id: OrderId,
    order_error: Option<SdkError>,
    capture_error: Option<SdkError>,
    calls: Rc<RefCell<Vec<SdkCall>>>,
}

#[async_trait(?Send)]
impl OrderActions for MockOrderActions {
    async fn create(
        &self,
        request: &OrderCreationRequest,
    ) -> std::result::Result<OrderId, SdkError> {
        self.calls
            .borrow_mut()
            .push(SdkCall::CreateOrder(self.funding, request.clone()));
        match &self.order_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.order_id.clone()),
        }
    }

    async fn capture(&self) -> std::result::Result<CaptureDetails, SdkError> {
        self.calls.borrow_mut().push(SdkCall::Capture(self.funding));
        match &self.capture_error {
            Some(err) => Err(err.clone()),
            None => Ok(CaptureDetails {
                id: self.order_id.clone(),
                status: Some("COMPLETED".into()),
            }),
        }
    }
}

/// Provider-style order id: 17 uppercase alphanumerics
fn generate_order_id() -> OrderId {
    let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    OrderId::new(&hex[..17])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_probe() {
        let sdk = MockPaymentSdk::new();
        sdk.load(&SdkOptions::new("sb")).await.unwrap();

        let capability = sdk.probe_wallet_capability().await.unwrap();
        match capability {
            WalletCapability::Configured(config) => assert!(config.has_allowed_methods()),
            WalletCapability::Missing => panic!("expected a configured wallet"),
        }
        assert_eq!(sdk.calls(), vec![SdkCall::Load, SdkCall::ProbeWallet]);
    }

    #[tokio::test]
    async fn test_load_failure() {
        let sdk = MockPaymentSdk::new().with_load_failure("blocked by client");
        let err = sdk.load(&SdkOptions::new("sb")).await.unwrap_err();
        assert_eq!(err.message, "blocked by client");
    }

    #[test]
    fn test_generated_order_id_shape() {
        let id = generate_order_id();
        assert_eq!(id.as_str().len(), 17);
        assert!(id.as_str().chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
