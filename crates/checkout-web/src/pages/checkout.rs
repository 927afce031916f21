//! Checkout Page

use std::collections::BTreeMap;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsValue;

use checkout_core::{
    CheckoutEvent, CheckoutOrchestrator, CheckoutState, FundingSource, MountStatus, OrderIntent,
};

use crate::api;
use crate::components::{LoadingIndicator, OrderSummary, PaymentSlot};
use crate::notices::AlertNotices;
use crate::paypal::PayPalSdk;

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let (state, set_state) = signal(CheckoutState::Loading);
    let (slots, set_slots) = signal(BTreeMap::<FundingSource, MountStatus>::new());
    let checkout = StoredValue::new_local(None::<Rc<CheckoutOrchestrator>>);

    leptos::task::spawn_local(async move {
        // Without a config the SDK cannot load: stay on the loading indicator
        let config = match api::fetch_config().await {
            Ok(config) => config,
            Err(e) => {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "Failed to load checkout config: {e}"
                )));
                return;
            }
        };

        let orchestrator = Rc::new(CheckoutOrchestrator::new(
            Rc::new(PayPalSdk::new()),
            config,
            OrderIntent::demo(),
            Rc::new(AlertNotices),
        ));

        orchestrator.subscribe(move |event| match event {
            CheckoutEvent::StateChanged(next) => set_state.set(*next),
            CheckoutEvent::SlotChanged(funding, status) => set_slots.update(|s| {
                s.insert(*funding, status.clone());
            }),
            CheckoutEvent::SdkLoadFailed(reason) => {
                web_sys::console::error_1(&JsValue::from_str(reason));
            }
            CheckoutEvent::PaymentCompleted(outcome) => {
                web_sys::console::log_1(&JsValue::from_str(&format!(
                    "{} payment completed: {}",
                    outcome.funding.display_name(),
                    outcome.order_id
                )));
            }
        });

        checkout.set_value(Some(Rc::clone(&orchestrator)));
        orchestrator.start().await;
    });

    on_cleanup(move || {
        checkout.try_with_value(|c| {
            if let Some(c) = c {
                c.teardown();
            }
        });
    });

    view! {
        <div class="app">
            <header class="app-header">
                <div class="header-content">
                    <h1>"Payment Demo"</h1>
                    <p>"Secure payments with PayPal and Google Pay"</p>
                </div>
            </header>

            <main class="payment-container">
                <div class="payment-section">
                    <OrderSummary intent=OrderIntent::demo() />

                    <div class="payment-options">
                        <h3>"Choose Payment Method"</h3>

                        <div class="payment-buttons">
                            <Show when=move || !state.get().is_ready()>
                                <LoadingIndicator />
                            </Show>
                            <PaymentSlot funding=FundingSource::Primary state=state slots=slots />
                            <PaymentSlot funding=FundingSource::Wallet state=state slots=slots />
                            <PaymentSlot
                                funding=FundingSource::Alternative
                                state=state
                                slots=slots
                            />
                        </div>
                    </div>
                </div>
            </main>
        </div>
    }
}
