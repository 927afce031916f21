//! Checkout Orchestrator
//!
//! Sequences SDK bootstrap, wallet eligibility and button mounting:
//!
//! ```text
//! Loading ──load ok──▶ Ready(WalletUnknown) ──probe──▶ Ready(WalletAvailable)
//!    │                    │                        └──▶ Ready(WalletUnavailable)
//!    │                    └─ mounts primary + alternative
//!    └─ load failed: stays Loading, no buttons
//! ```
//!
//! `Ready(*)` is terminal for the page session. The orchestrator is the only
//! writer of its state; presentation reads it through [`CheckoutEvent`]s.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::button::{ButtonAdapter, ButtonBinding, CompletionHandler, MountStatus};
use crate::config::{CheckoutConfig, ProbeMode};
use crate::error::{CheckoutError, SdkError};
use crate::funding::FundingSource;
use crate::notice::{Notice, NoticeSink};
use crate::order::{OrderIntent, PaymentOutcome};
use crate::sdk::PaymentSdk;
use crate::wallet::{WalletCapability, WalletConfiguration};

/// Wallet eligibility once the SDK is ready
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletEligibility {
    Unknown,
    Available,
    Unavailable,
}

/// Page-level state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "wallet", rename_all = "snake_case")]
pub enum CheckoutState {
    Loading,
    Ready(WalletEligibility),
}

impl CheckoutState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub const fn wallet(self) -> Option<WalletEligibility> {
        match self {
            Self::Loading => None,
            Self::Ready(wallet) => Some(wallet),
        }
    }
}

/// Pushed to listeners as the checkout progresses
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutEvent {
    StateChanged(CheckoutState),
    SlotChanged(FundingSource, MountStatus),
    SdkLoadFailed(String),
    PaymentCompleted(PaymentOutcome),
}

pub type EventListener = Rc<dyn Fn(&CheckoutEvent)>;

/// Drives SDK load, wallet probing and button mounting
pub struct CheckoutOrchestrator {
    sdk: Rc<dyn PaymentSdk>,
    config: CheckoutConfig,
    intent: RefCell<Rc<OrderIntent>>,
    notices: Rc<dyn NoticeSink>,
    state: Cell<CheckoutState>,
    load_started: Cell<bool>,
    probe_started: Cell<bool>,
    wallet_config: RefCell<Option<Rc<WalletConfiguration>>>,
    adapters: BTreeMap<FundingSource, ButtonAdapter>,
    listeners: Rc<RefCell<Vec<EventListener>>>,
}

impl CheckoutOrchestrator {
    pub fn new(
        sdk: Rc<dyn PaymentSdk>,
        config: CheckoutConfig,
        intent: OrderIntent,
        notices: Rc<dyn NoticeSink>,
    ) -> Self {
        Self {
            sdk,
            config,
            intent: RefCell::new(Rc::new(intent)),
            notices,
            state: Cell::new(CheckoutState::Loading),
            load_started: Cell::new(false),
            probe_started: Cell::new(false),
            wallet_config: RefCell::new(None),
            adapters: FundingSource::ALL
                .into_iter()
                .map(|funding| (funding, ButtonAdapter::new(funding)))
                .collect(),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&CheckoutEvent) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn state(&self) -> CheckoutState {
        self.state.get()
    }

    pub fn wallet_eligibility(&self) -> WalletEligibility {
        self.state().wallet().unwrap_or(WalletEligibility::Unknown)
    }

    pub fn wallet_config(&self) -> Option<Rc<WalletConfiguration>> {
        self.wallet_config.borrow().clone()
    }

    pub fn intent(&self) -> Rc<OrderIntent> {
        Rc::clone(&self.intent.borrow())
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn slot_status(&self, funding: FundingSource) -> MountStatus {
        self.adapter(funding).status()
    }

    /// Load the SDK, mount the always-offered buttons, then probe the wallet.
    ///
    /// A load failure leaves the page in `Loading`; nothing is retried.
    pub async fn start(&self) {
        if self.load_started.replace(true) {
            tracing::debug!("Checkout already started");
            return;
        }

        tracing::info!(
            sdk = self.sdk.name(),
            currency = %self.config.sdk.currency,
            "Loading payment SDK"
        );
        if let Err(source) = self.sdk.load(&self.config.sdk).await {
            let err = CheckoutError::SdkLoad(source);
            tracing::error!("{err}");
            self.emit(&CheckoutEvent::SdkLoadFailed(err.to_string()));
            return;
        }

        self.sdk_ready().await;
        self.probe_wallet().await;
    }

    /// `Loading → Ready(WalletUnknown)`; mounts primary and alternative once
    pub async fn sdk_ready(&self) {
        if self.state().is_ready() {
            tracing::debug!("SDK already marked ready");
            return;
        }
        self.transition(CheckoutState::Ready(WalletEligibility::Unknown));

        self.mount(FundingSource::Primary).await;
        self.mount(FundingSource::Alternative).await;
    }

    /// Ask the SDK about wallet support; a no-op before `Ready` or when
    /// a probe was already issued
    pub async fn probe_wallet(&self) {
        if !self.state().is_ready() {
            tracing::warn!("Wallet probe requested before the SDK is ready; skipping");
            return;
        }
        if self.probe_started.replace(true) {
            tracing::debug!("Wallet probe already issued");
            return;
        }

        let result = self.sdk.probe_wallet_capability().await;
        self.wallet_probed(result).await;
    }

    /// Resolve wallet eligibility from a probe result. Only the first result
    /// after `Ready` counts; later ones are ignored.
    pub async fn wallet_probed(&self, result: Result<WalletCapability, SdkError>) {
        match self.state() {
            CheckoutState::Loading => {
                tracing::warn!("Wallet probe result before the SDK is ready; ignoring");
                return;
            }
            CheckoutState::Ready(WalletEligibility::Unknown) => {}
            CheckoutState::Ready(resolved) => {
                tracing::debug!(?resolved, "Wallet eligibility already resolved; ignoring");
                return;
            }
        }

        let config = match result {
            Err(source) => {
                let err = CheckoutError::EligibilityProbe(source);
                tracing::warn!("{err}");
                None
            }
            Ok(WalletCapability::Missing) => {
                tracing::info!("Wallet component not loaded");
                None
            }
            Ok(WalletCapability::Configured(config)) => match self.config.probe_mode {
                ProbeMode::AllowedMethods if !config.has_allowed_methods() => {
                    tracing::info!("Wallet not available: no allowed payment methods");
                    None
                }
                _ => Some(Rc::new(config)),
            },
        };

        match config {
            Some(config) => {
                *self.wallet_config.borrow_mut() = Some(config);
                self.transition(CheckoutState::Ready(WalletEligibility::Available));
                self.mount(FundingSource::Wallet).await;
            }
            None => {
                self.transition(CheckoutState::Ready(WalletEligibility::Unavailable));
                self.mark(FundingSource::Wallet, MountStatus::Unavailable);
            }
        }
    }

    /// Swap the order and re-mount every live button with it
    pub async fn replace_intent(&self, intent: OrderIntent) {
        *self.intent.borrow_mut() = Rc::new(intent);

        let live: Vec<FundingSource> = self
            .adapters
            .values()
            .filter(|adapter| adapter.is_live())
            .map(ButtonAdapter::funding)
            .collect();
        for funding in live {
            self.mount(funding).await;
        }
    }

    /// Dispose every live button
    pub fn teardown(&self) {
        for adapter in self.adapters.values() {
            adapter.dispose();
        }
    }

    async fn mount(&self, funding: FundingSource) {
        let binding = self.binding(funding);
        let status = self.adapter(funding).mount(self.sdk.as_ref(), Rc::new(binding)).await;
        self.emit(&CheckoutEvent::SlotChanged(funding, status));
    }

    fn binding(&self, funding: FundingSource) -> ButtonBinding {
        let binding = ButtonBinding::new(
            funding,
            self.intent(),
            self.completion_handler(),
            Rc::clone(&self.notices),
        );
        match (funding.requires_wallet_config(), self.wallet_config()) {
            (true, Some(config)) => binding.with_wallet(config),
            _ => binding,
        }
    }

    fn completion_handler(&self) -> CompletionHandler {
        let notices = Rc::clone(&self.notices);
        let listeners = Rc::clone(&self.listeners);
        Rc::new(move |outcome: PaymentOutcome| {
            tracing::info!(
                funding = %outcome.funding,
                order_id = %outcome.order_id,
                "Payment completed"
            );
            notices.notify(&Notice::PaymentSucceeded(outcome.clone()));
            notify_all(&listeners, &CheckoutEvent::PaymentCompleted(outcome));
        })
    }

    fn adapter(&self, funding: FundingSource) -> &ButtonAdapter {
        // populated for every funding source in `new`
        &self.adapters[&funding]
    }

    fn mark(&self, funding: FundingSource, status: MountStatus) {
        self.adapter(funding).set_status(status.clone());
        self.emit(&CheckoutEvent::SlotChanged(funding, status));
    }

    fn transition(&self, next: CheckoutState) {
        let previous = self.state.replace(next);
        tracing::info!(?previous, ?next, "Checkout state changed");
        self.emit(&CheckoutEvent::StateChanged(next));
    }

    fn emit(&self, event: &CheckoutEvent) {
        notify_all(&self.listeners, event);
    }
}

fn notify_all(listeners: &RefCell<Vec<EventListener>>, event: &CheckoutEvent) {
    // clone so a listener may subscribe while being notified
    let listeners = listeners.borrow().clone();
    for listener in listeners {
        listener(event);
    }
}
