//! UI Components

use std::collections::BTreeMap;

use leptos::prelude::*;

use checkout_core::order::format_amount;
use checkout_core::{CheckoutState, FundingSource, MountStatus, OrderIntent, WalletEligibility};

/// Display-only order summary
#[component]
pub fn OrderSummary(intent: OrderIntent) -> impl IntoView {
    let total = format_amount(intent.total());

    view! {
        <div class="order-summary">
            <h2>"Order Summary"</h2>
            <div class="order-items">
                {intent
                    .items
                    .into_iter()
                    .map(|item| {
                        view! {
                            <div class="order-item">
                                <span>{item.label}</span>
                                <span>{format_amount(item.amount)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
                <div class="order-total">
                    <span>"Total"</span>
                    <span>{total}</span>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="loading-container">
            <div class="loading-spinner"></div>
            <p>"Loading payment options..."</p>
        </div>
    }
}

/// Heading, mount point and inline fallback for one funding source.
///
/// The mount point stays in the DOM and is only hidden, so the SDK can render
/// into it as soon as the orchestrator mounts the button.
#[component]
pub fn PaymentSlot(
    funding: FundingSource,
    state: ReadSignal<CheckoutState>,
    slots: ReadSignal<BTreeMap<FundingSource, MountStatus>>,
) -> impl IntoView {
    let status = move || {
        slots.with(|s| s.get(&funding).cloned().unwrap_or(MountStatus::Pending))
    };
    let visible = move || match state.get() {
        CheckoutState::Loading => false,
        CheckoutState::Ready(wallet) => {
            funding != FundingSource::Wallet || wallet != WalletEligibility::Unknown
        }
    };
    let notice = move || status().inline_notice(funding);
    let mount_id = funding.mount_point().id().to_string();

    view! {
        <div
            class="payment-button-wrapper"
            style:display=move || if visible() { "block" } else { "none" }
        >
            <h4>{funding.display_name()}</h4>
            <div
                id=mount_id
                style:display=move || if notice().is_some() { "none" } else { "block" }
            ></div>
            {move || notice().map(|text| view! { <p class="inline-notice">{text}</p> })}
        </div>
    }
}
