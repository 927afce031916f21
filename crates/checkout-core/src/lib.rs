//! # checkout-core
//!
//! Checkout orchestration for a page that delegates payment capture to a
//! provider's hosted SDK.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    CheckoutOrchestrator                      │
//! │  Loading ─▶ Ready(WalletUnknown ─▶ Available | Unavailable)  │
//! │                                                              │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐     │
//! │  │ ButtonAdapter │  │ ButtonAdapter │  │ ButtonAdapter │     │
//! │  │   primary     │  │    wallet     │  │  alternative  │     │
//! │  └───────┬───────┘  └───────┬───────┘  └───────┬───────┘     │
//! └──────────┼──────────────────┼──────────────────┼─────────────┘
//!            └──────────────────┼──────────────────┘
//!                      ┌────────▼────────┐
//!                      │   PaymentSdk    │  (injected: PayPal JS / mock)
//!                      └─────────────────┘
//! ```
//!
//! The `PaymentSdk` trait is the only way out to the provider, so the whole
//! state machine runs against [`sdk::MockPaymentSdk`] in tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutConfig, CheckoutOrchestrator, OrderIntent};
//!
//! let checkout =
//!     CheckoutOrchestrator::new(sdk, CheckoutConfig::from_env(), OrderIntent::demo(), notices);
//! checkout.subscribe(|event| render(event));
//! checkout.start().await;
//! ```

pub mod button;
pub mod config;
pub mod error;
pub mod funding;
pub mod notice;
pub mod orchestrator;
pub mod order;
pub mod sdk;
pub mod wallet;

pub use button::{ButtonAdapter, ButtonBinding, MountStatus};
pub use config::{CheckoutConfig, ProbeMode};
pub use error::{CheckoutError, Result, SdkError};
pub use funding::{FundingSource, MountPoint};
pub use notice::{MemoryNoticeSink, Notice, NoticeSink};
pub use orchestrator::{CheckoutEvent, CheckoutOrchestrator, CheckoutState, WalletEligibility};
pub use order::{OrderId, OrderIntent, PaymentOutcome};
pub use sdk::{PaymentSdk, SdkOptions};
pub use wallet::{WalletCapability, WalletConfiguration};
