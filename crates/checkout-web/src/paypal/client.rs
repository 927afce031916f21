//! PayPal JS SDK client
//!
//! `PaymentSdk` over the raw bindings: injects the SDK script, probes the
//! Google Pay component and wires Rust button callbacks into `paypal.Buttons`.

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::js_sys::{Object, Promise, Reflect};
use web_sys::HtmlScriptElement;

use checkout_core::order::{Approval, CaptureDetails, OrderCreationRequest, OrderId};
use checkout_core::sdk::{
    ButtonCallbacks, ButtonHandle, ButtonSpec, OrderActions, PaymentSdk, SdkOptions,
};
use checkout_core::{
    FundingSource, MountPoint, SdkError, WalletCapability, WalletConfiguration,
};

use super::bindings::{self, js_error, settle, JsButtons, JsOrderActions};

/// The hosted PayPal SDK, loaded on demand
#[derive(Default)]
pub struct PayPalSdk;

impl PayPalSdk {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl PaymentSdk for PayPalSdk {
    async fn load(&self, options: &SdkOptions) -> Result<(), SdkError> {
        if bindings::paypal().is_none() {
            inject_script(&options.script_url()).await?;
        }
        bindings::paypal()
            .map(|_| ())
            .ok_or_else(|| SdkError::new("SDK script loaded but window.paypal is missing"))
    }

    async fn probe_wallet_capability(&self) -> Result<WalletCapability, SdkError> {
        let paypal = bindings::paypal().ok_or_else(|| SdkError::new("SDK not loaded"))?;
        if paypal.googlepay_component().is_undefined() {
            return Ok(WalletCapability::Missing);
        }

        let googlepay = paypal.googlepay().map_err(js_error)?;
        let value = settle(googlepay.config().map_err(js_error)?).await?;
        let config: WalletConfiguration = bindings::from_js(&value)?;
        Ok(WalletCapability::Configured(config))
    }

    fn create_button(
        &self,
        spec: ButtonSpec,
        callbacks: Rc<dyn ButtonCallbacks>,
    ) -> Result<Box<dyn ButtonHandle>, SdkError> {
        let paypal = bindings::paypal().ok_or_else(|| SdkError::new("SDK not loaded"))?;

        if let Some(config) = &spec.wallet {
            web_sys::console::debug_1(&JsValue::from_str(&format!(
                "Google Pay networks: {}",
                config.card_networks().join(", ")
            )));
        }

        let closures = ButtonClosures::new(callbacks);
        let options = closures.options(spec.funding)?;
        let buttons = paypal.buttons(&options).map_err(js_error)?;

        Ok(Box::new(PayPalButton {
            buttons,
            _closures: closures,
        }))
    }

    fn name(&self) -> &str {
        "PayPal JS SDK"
    }
}

/// Append a `<script>` tag and wait for it to load
async fn inject_script(src: &str) -> Result<(), SdkError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| SdkError::new("no document"))?;
    let head = document.head().ok_or_else(|| SdkError::new("document has no <head>"))?;

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| SdkError::new("created element is not a <script>"))?;
    script.set_src(src);
    script.set_async(true);

    let loaded = Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    head.append_child(&script).map_err(js_error)?;

    settle(loaded)
        .await
        .map(|_| ())
        .map_err(|_| SdkError::new(format!("failed to load {src}")))
}

/// JS closures handed to `paypal.Buttons`; dropped with the button
struct ButtonClosures {
    create_order: Closure<dyn FnMut(JsValue, JsValue) -> Promise>,
    on_approve: Closure<dyn FnMut(JsValue, JsValue) -> Promise>,
    on_error: Closure<dyn FnMut(JsValue)>,
}

impl ButtonClosures {
    fn new(callbacks: Rc<dyn ButtonCallbacks>) -> Self {
        let gate = Rc::new(FailureGate::default());

        let create_order: Closure<dyn FnMut(JsValue, JsValue) -> Promise> = {
            let callbacks = Rc::clone(&callbacks);
            let gate = Rc::clone(&gate);
            Closure::new(move |_data: JsValue, actions: JsValue| -> Promise {
                gate.order_started();
                let callbacks = Rc::clone(&callbacks);
                let gate = Rc::clone(&gate);
                future_to_promise(async move {
                    let actions = JsActions::from_callback(&actions).map_err(sdk_to_js)?;
                    match callbacks.create_order(&actions).await {
                        Ok(order_id) => Ok(JsValue::from_str(order_id.as_str())),
                        Err(err) => {
                            gate.order_failed();
                            Err(JsValue::from_str(&err.to_string()))
                        }
                    }
                })
            })
        };

        let on_approve: Closure<dyn FnMut(JsValue, JsValue) -> Promise> = {
            let callbacks = Rc::clone(&callbacks);
            Closure::new(move |data: JsValue, actions: JsValue| -> Promise {
                let callbacks = Rc::clone(&callbacks);
                future_to_promise(async move {
                    let approval: Approval = bindings::from_js(&data).map_err(sdk_to_js)?;
                    let actions = JsActions::from_callback(&actions).map_err(sdk_to_js)?;
                    // capture failures are reported by the binding; resolve either way
                    let _ = callbacks.on_approve(&approval, &actions).await;
                    Ok(JsValue::UNDEFINED)
                })
            })
        };

        let on_error: Closure<dyn FnMut(JsValue)> = Closure::new(move |err: JsValue| {
            if gate.should_report() {
                callbacks.on_error(js_error(err));
            }
        });

        Self {
            create_order,
            on_approve,
            on_error,
        }
    }

    fn options(&self, funding: FundingSource) -> Result<JsValue, SdkError> {
        let options = Object::new();
        let funding_source = JsValue::from_str(funding.sdk_code());
        let entries: [(&str, &JsValue); 4] = [
            ("fundingSource", &funding_source),
            ("createOrder", self.create_order.as_ref()),
            ("onApprove", self.on_approve.as_ref()),
            ("onError", self.on_error.as_ref()),
        ];
        for (key, value) in entries {
            Reflect::set(&options, &JsValue::from_str(key), value).map_err(js_error)?;
        }
        Ok(options.into())
    }
}

/// A rejected createOrder makes the SDK call onError as well. The failure has
/// already been reported, so that one onError is dropped.
#[derive(Default)]
struct FailureGate {
    pending: Cell<bool>,
}

impl FailureGate {
    fn order_started(&self) {
        self.pending.set(false);
    }

    fn order_failed(&self) {
        self.pending.set(true);
    }

    /// Consumes a pending createOrder failure
    fn should_report(&self) -> bool {
        !self.pending.replace(false)
    }
}

fn sdk_to_js(err: SdkError) -> JsValue {
    JsValue::from_str(&err.message)
}

struct PayPalButton {
    buttons: JsButtons,
    _closures: ButtonClosures,
}

#[async_trait(?Send)]
impl ButtonHandle for PayPalButton {
    fn is_eligible(&self) -> bool {
        self.buttons.is_eligible()
    }

    async fn render(&self, mount_point: &MountPoint) -> Result<(), SdkError> {
        let promise = self.buttons.render(&mount_point.selector()).map_err(js_error)?;
        settle(promise).await.map(|_| ())
    }

    fn close(&self) {
        match self.buttons.close() {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = settle(promise).await {
                    web_sys::console::warn_1(&JsValue::from_str(&err.message));
                }
            }),
            Err(err) => web_sys::console::warn_1(&err),
        }
    }
}

/// `actions.order` as `OrderActions`
struct JsActions {
    order: JsOrderActions,
}

impl JsActions {
    fn from_callback(actions: &JsValue) -> Result<Self, SdkError> {
        Ok(Self {
            order: bindings::order_actions(actions)?,
        })
    }
}

#[async_trait(?Send)]
impl OrderActions for JsActions {
    async fn create(&self, request: &OrderCreationRequest) -> Result<OrderId, SdkError> {
        let descriptor = bindings::to_js(request)?;
        let value = settle(self.order.create(&descriptor).map_err(js_error)?).await?;
        value
            .as_string()
            .map(OrderId::from)
            .ok_or_else(|| SdkError::new("order id is not a string"))
    }

    async fn capture(&self) -> Result<CaptureDetails, SdkError> {
        let value = settle(self.order.capture().map_err(js_error)?).await?;
        bindings::from_js(&value)
    }
}
