//! Button Adapter
//!
//! One parameterized adapter serves every funding source. A [`ButtonBinding`]
//! carries the inputs a button is built from and answers the SDK callbacks; a
//! [`ButtonAdapter`] owns the mount point and the live handle, and runs the
//! lifecycle:
//!
//! ```text
//! mount ──▶ dispose previous ──▶ create ──▶ is_eligible? ──yes──▶ render
//!                                              │
//!                                              no ──▶ inline "not available"
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result, SdkError};
use crate::funding::{FundingSource, MountPoint};
use crate::notice::{Notice, NoticeSink};
use crate::order::{Approval, OrderCreationRequest, OrderId, OrderIntent, PaymentOutcome};
use crate::sdk::{ButtonCallbacks, ButtonHandle, ButtonSpec, OrderActions, PaymentSdk};
use crate::wallet::WalletConfiguration;

/// Called once per successful capture
pub type CompletionHandler = Rc<dyn Fn(PaymentOutcome)>;

/// Inputs a button is bound to; any change means a re-mount
pub struct ButtonBinding {
    funding: FundingSource,
    intent: Rc<OrderIntent>,
    wallet: Option<Rc<WalletConfiguration>>,
    on_complete: CompletionHandler,
    notices: Rc<dyn NoticeSink>,
}

impl ButtonBinding {
    pub fn new(
        funding: FundingSource,
        intent: Rc<OrderIntent>,
        on_complete: CompletionHandler,
        notices: Rc<dyn NoticeSink>,
    ) -> Self {
        Self {
            funding,
            intent,
            wallet: None,
            on_complete,
            notices,
        }
    }

    #[must_use]
    pub fn with_wallet(mut self, config: Rc<WalletConfiguration>) -> Self {
        self.wallet = Some(config);
        self
    }

    pub const fn funding(&self) -> FundingSource {
        self.funding
    }

    pub fn wallet(&self) -> Option<&Rc<WalletConfiguration>> {
        self.wallet.as_ref()
    }

    /// Purchase descriptor for this activation
    pub fn order_request(&self) -> OrderCreationRequest {
        self.intent.purchase_request()
    }

    fn report(&self, err: &CheckoutError) {
        tracing::error!(funding = %self.funding, "{err}");
        self.notices.notify(&Notice::PaymentFailed {
            funding: self.funding,
            message: err.user_message(),
        });
    }
}

#[async_trait(?Send)]
impl ButtonCallbacks for ButtonBinding {
    async fn create_order(&self, actions: &dyn OrderActions) -> Result<OrderId> {
        let request = self.order_request();
        match actions.create(&request).await {
            Ok(order_id) => {
                tracing::debug!(funding = %self.funding, %order_id, "Order created");
                Ok(order_id)
            }
            Err(source) => {
                let err = CheckoutError::OrderCreation {
                    funding: self.funding,
                    source,
                };
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn on_approve(
        &self,
        approval: &Approval,
        actions: &dyn OrderActions,
    ) -> Result<PaymentOutcome> {
        tracing::debug!(
            funding = %self.funding,
            order_id = %approval.order_id,
            "Order approved, capturing"
        );
        match actions.capture().await {
            Ok(details) => {
                let outcome = PaymentOutcome {
                    funding: self.funding,
                    order_id: details.id,
                };
                (self.on_complete)(outcome.clone());
                Ok(outcome)
            }
            Err(source) => {
                let err = CheckoutError::Capture {
                    funding: self.funding,
                    source,
                };
                self.report(&err);
                Err(err)
            }
        }
    }

    fn on_error(&self, error: SdkError) {
        let err = CheckoutError::Provider {
            funding: self.funding,
            source: error,
        };
        self.report(&err);
    }
}

/// What a slot currently shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum MountStatus {
    /// Nothing mounted yet
    Pending,
    /// Button rendered into its mount point
    Rendered,
    /// SDK reported the button as ineligible; nothing rendered
    Ineligible,
    /// Funding source is not offered at all
    Unavailable,
    /// Inputs were missing; logged and skipped
    Skipped,
    /// Creation or render failed
    Failed(String),
}

impl MountStatus {
    /// Inline text replacing the mount point, if any
    pub fn inline_notice(&self, funding: FundingSource) -> Option<String> {
        match self {
            Self::Ineligible | Self::Unavailable => Some(format!(
                "{} is not available on this device.",
                funding.display_name()
            )),
            Self::Failed(_) => Some(format!("{} could not be loaded.", funding.display_name())),
            Self::Pending | Self::Rendered | Self::Skipped => None,
        }
    }
}

/// Owns one mount point and at most one live button handle
pub struct ButtonAdapter {
    funding: FundingSource,
    mount_point: MountPoint,
    live: RefCell<Option<Rc<dyn ButtonHandle>>>,
    status: RefCell<MountStatus>,
    generation: Cell<u64>,
}

impl ButtonAdapter {
    pub fn new(funding: FundingSource) -> Self {
        Self {
            funding,
            mount_point: funding.mount_point(),
            live: RefCell::new(None),
            status: RefCell::new(MountStatus::Pending),
            generation: Cell::new(0),
        }
    }

    pub const fn funding(&self) -> FundingSource {
        self.funding
    }

    pub const fn mount_point(&self) -> &MountPoint {
        &self.mount_point
    }

    pub fn status(&self) -> MountStatus {
        self.status.borrow().clone()
    }

    pub fn is_live(&self) -> bool {
        self.live.borrow().is_some()
    }

    /// Mark the slot without mounting anything
    pub fn set_status(&self, status: MountStatus) {
        *self.status.borrow_mut() = status;
    }

    /// Dispose the current handle, then build and render a new one.
    ///
    /// The handle becomes live before `render` is awaited, so a mount or
    /// dispose that happens meanwhile closes it. A render finishing after that
    /// leaves the newer status alone.
    pub async fn mount(&self, sdk: &dyn PaymentSdk, binding: Rc<ButtonBinding>) -> MountStatus {
        self.dispose();
        let generation = self.generation.get();

        if binding.funding() != self.funding {
            tracing::warn!(
                funding = %self.funding,
                bound = %binding.funding(),
                "Binding is for another funding source; skipping"
            );
            return self.settle(generation, MountStatus::Skipped);
        }

        if self.funding.requires_wallet_config() && binding.wallet().is_none() {
            tracing::warn!(funding = %self.funding, "No wallet configuration yet; skipping mount");
            return self.settle(generation, MountStatus::Skipped);
        }

        let spec = ButtonSpec {
            funding: self.funding,
            wallet: binding.wallet().cloned(),
        };
        let handle: Rc<dyn ButtonHandle> = match sdk.create_button(spec, binding) {
            Ok(handle) => Rc::from(handle),
            Err(source) => {
                let err = CheckoutError::Render {
                    funding: self.funding,
                    source,
                };
                tracing::error!("{err}");
                return self.settle(generation, MountStatus::Failed(err.to_string()));
            }
        };

        if !handle.is_eligible() {
            let err = CheckoutError::IneligibleRender(self.funding);
            tracing::info!("{err}; showing fallback");
            return self.settle(generation, MountStatus::Ineligible);
        }

        *self.live.borrow_mut() = Some(Rc::clone(&handle));
        let rendered = handle.render(&self.mount_point).await;

        if self.generation.get() != generation {
            tracing::debug!(funding = %self.funding, "Mount superseded during render");
            return self.status();
        }

        match rendered {
            Ok(()) => {
                tracing::info!(
                    funding = %self.funding,
                    mount_point = %self.mount_point,
                    "Button rendered"
                );
                self.settle(generation, MountStatus::Rendered)
            }
            Err(source) => {
                self.live.borrow_mut().take();
                let err = CheckoutError::Render {
                    funding: self.funding,
                    source,
                };
                tracing::error!("{err}");
                self.settle(generation, MountStatus::Failed(err.to_string()))
            }
        }
    }

    /// Close the live handle, if any. A render still in flight is superseded.
    pub fn dispose(&self) {
        self.generation.set(self.generation.get() + 1);
        let handle = self.live.borrow_mut().take();
        if let Some(handle) = handle {
            tracing::debug!(funding = %self.funding, "Disposing button");
            handle.close();
            self.set_status(MountStatus::Pending);
        }
    }

    fn settle(&self, generation: u64, status: MountStatus) -> MountStatus {
        if self.generation.get() == generation {
            self.set_status(status.clone());
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::MemoryNoticeSink;
    use crate::sdk::{MockPaymentSdk, SdkCall, SdkOptions};
    use crate::wallet::WalletCapability;
    use rust_decimal_macros::dec;

    /// SDK whose render yields once before completing
    struct YieldingSdk {
        closed: Rc<Cell<bool>>,
    }

    struct YieldingButton {
        closed: Rc<Cell<bool>>,
    }

    #[async_trait(?Send)]
    impl ButtonHandle for YieldingButton {
        fn is_eligible(&self) -> bool {
            true
        }

        async fn render(&self, _mount_point: &MountPoint) -> std::result::Result<(), SdkError> {
            tokio::task::yield_now().await;
            Ok(())
        }

        fn close(&self) {
            self.closed.set(true);
        }
    }

    #[async_trait(?Send)]
    impl PaymentSdk for YieldingSdk {
        async fn load(&self, _options: &SdkOptions) -> std::result::Result<(), SdkError> {
            Ok(())
        }

        async fn probe_wallet_capability(&self) -> std::result::Result<WalletCapability, SdkError> {
            Ok(WalletCapability::Missing)
        }

        fn create_button(
            &self,
            _spec: ButtonSpec,
            _callbacks: Rc<dyn ButtonCallbacks>,
        ) -> std::result::Result<Box<dyn ButtonHandle>, SdkError> {
            Ok(Box::new(YieldingButton {
                closed: Rc::clone(&self.closed),
            }))
        }

        fn name(&self) -> &str {
            "YieldingSdk"
        }
    }

    fn binding(
        funding: FundingSource,
        notices: &Rc<MemoryNoticeSink>,
        completed: &Rc<RefCell<Vec<PaymentOutcome>>>,
    ) -> ButtonBinding {
        let completed = Rc::clone(completed);
        ButtonBinding::new(
            funding,
            Rc::new(OrderIntent::demo()),
            Rc::new(move |outcome| completed.borrow_mut().push(outcome)),
            Rc::clone(notices) as Rc<dyn NoticeSink>,
        )
    }

    #[test]
    fn test_order_request_ignores_funding_source() {
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));

        for funding in FundingSource::ALL {
            let request = binding(funding, &notices, &completed).order_request();
            assert_eq!(request.amount_value(), Some("24.97"));
            assert!(!request.purchase_units[0].description.is_empty());
        }
        assert_eq!(OrderIntent::demo().total(), dec!(24.97));
    }

    #[tokio::test]
    async fn test_capture_passes_order_id_unmodified() {
        let sdk = MockPaymentSdk::new().with_order_id("5O190127TN364715T");
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Primary);

        let status = adapter
            .mount(&sdk, Rc::new(binding(FundingSource::Primary, &notices, &completed)))
            .await;
        assert_eq!(status, MountStatus::Rendered);

        let outcome = sdk.approve(FundingSource::Primary).await.unwrap();
        assert_eq!(outcome.order_id.as_str(), "5O190127TN364715T");

        let completed = completed.borrow();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].order_id.as_str(), "5O190127TN364715T");
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_capture_failure_notifies_without_completion() {
        let sdk = MockPaymentSdk::new().with_capture_failure("INSTRUMENT_DECLINED");
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Alternative);
        adapter
            .mount(&sdk, Rc::new(binding(FundingSource::Alternative, &notices, &completed)))
            .await;

        let err = sdk.approve(FundingSource::Alternative).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Capture { .. }));
        assert!(completed.borrow().is_empty());
        assert_eq!(
            notices.notices(),
            vec![Notice::PaymentFailed {
                funding: FundingSource::Alternative,
                message: "Card payment failed. Please try again.".into(),
            }]
        );
        // no retry
        assert_eq!(sdk.count(&SdkCall::Capture(FundingSource::Alternative)), 1);
    }

    #[tokio::test]
    async fn test_order_creation_failure_skips_capture() {
        let sdk = MockPaymentSdk::new().with_order_failure("UNPROCESSABLE_ENTITY");
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Primary);
        adapter
            .mount(&sdk, Rc::new(binding(FundingSource::Primary, &notices, &completed)))
            .await;

        let err = sdk.approve(FundingSource::Primary).await.unwrap_err();
        assert!(matches!(err, CheckoutError::OrderCreation { .. }));
        assert_eq!(sdk.count(&SdkCall::Capture(FundingSource::Primary)), 0);
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_notice() {
        let sdk = MockPaymentSdk::new();
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let config = Rc::new(MockPaymentSdk::wallet_config());
        let adapter = ButtonAdapter::new(FundingSource::Wallet);
        adapter
            .mount(
                &sdk,
                Rc::new(binding(FundingSource::Wallet, &notices, &completed).with_wallet(config)),
            )
            .await;

        assert!(sdk.fail(FundingSource::Wallet, "popup closed"));
        assert_eq!(
            notices.notices()[0].message(),
            "Google Pay payment failed. Please try again."
        );
        assert_eq!(adapter.status(), MountStatus::Rendered);
    }

    #[tokio::test]
    async fn test_ineligible_wallet_never_renders() {
        let sdk = MockPaymentSdk::new().with_ineligible(FundingSource::Wallet);
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let config = Rc::new(MockPaymentSdk::wallet_config());
        let adapter = ButtonAdapter::new(FundingSource::Wallet);

        let status = adapter
            .mount(
                &sdk,
                Rc::new(binding(FundingSource::Wallet, &notices, &completed).with_wallet(config)),
            )
            .await;

        assert_eq!(status, MountStatus::Ineligible);
        assert_eq!(sdk.renders(FundingSource::Wallet), 0);
        assert!(!adapter.is_live());
        assert_eq!(
            status.inline_notice(FundingSource::Wallet).as_deref(),
            Some("Google Pay is not available on this device.")
        );
    }

    #[tokio::test]
    async fn test_wallet_without_config_is_skipped() {
        let sdk = MockPaymentSdk::new();
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Wallet);

        let status = adapter
            .mount(&sdk, Rc::new(binding(FundingSource::Wallet, &notices, &completed)))
            .await;

        assert_eq!(status, MountStatus::Skipped);
        assert_eq!(sdk.created(FundingSource::Wallet), 0);
    }

    #[tokio::test]
    async fn test_remount_disposes_previous_handle() {
        let sdk = MockPaymentSdk::new();
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Primary);

        for _ in 0..3 {
            adapter
                .mount(&sdk, Rc::new(binding(FundingSource::Primary, &notices, &completed)))
                .await;
        }

        assert_eq!(sdk.created(FundingSource::Primary), 3);
        assert_eq!(sdk.count(&SdkCall::Close(FundingSource::Primary)), 2);
        assert_eq!(sdk.live_buttons(FundingSource::Primary), 1);

        adapter.dispose();
        assert_eq!(sdk.live_buttons(FundingSource::Primary), 0);
        assert_eq!(adapter.status(), MountStatus::Pending);
    }

    #[tokio::test]
    async fn test_render_failure_reported() {
        let sdk = MockPaymentSdk::new().with_render_failure(FundingSource::Alternative);
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Alternative);

        let status = adapter
            .mount(&sdk, Rc::new(binding(FundingSource::Alternative, &notices, &completed)))
            .await;

        assert!(matches!(status, MountStatus::Failed(_)));
        assert!(!adapter.is_live());
        // inline text, not a blocking notice
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_dispose_during_render_supersedes_it() {
        let sdk = YieldingSdk {
            closed: Rc::new(Cell::new(false)),
        };
        let notices = Rc::new(MemoryNoticeSink::new());
        let completed = Rc::new(RefCell::new(Vec::new()));
        let adapter = ButtonAdapter::new(FundingSource::Primary);

        let (status, ()) = tokio::join!(
            adapter.mount(&sdk, Rc::new(binding(FundingSource::Primary, &notices, &completed))),
            async { adapter.dispose() }
        );

        assert_eq!(status, MountStatus::Pending);
        assert_eq!(adapter.status(), MountStatus::Pending);
        assert!(!adapter.is_live());
        assert!(sdk.closed.get());
    }
}
