//! Low-level wasm-bindgen bindings to the PayPal JS SDK.
//!
//! Exposes the raw `window.paypal` handles and their promise-returning methods.
//! The `PaymentSdk` implementation over them lives in `client.rs`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Error, Promise, Reflect, JSON};

use checkout_core::SdkError;

#[wasm_bindgen]
extern "C" {
    //------------------------------------------------------------------------------
    // Core Types
    //------------------------------------------------------------------------------

    /// The `window.paypal` namespace
    #[derive(Debug, Clone)]
    pub type JsPayPal;

    /// Instance returned by `paypal.Buttons(options)`
    #[derive(Debug, Clone)]
    pub type JsButtons;

    /// Instance returned by `paypal.Googlepay()`
    #[derive(Debug, Clone)]
    pub type JsGooglepay;

    /// `actions.order` handed to button callbacks
    #[derive(Debug, Clone)]
    pub type JsOrderActions;

    //------------------------------------------------------------------------------
    // Namespace
    //------------------------------------------------------------------------------

    /// `paypal.Buttons({ fundingSource, createOrder, onApprove, onError })`
    #[wasm_bindgen(method, catch, js_name = Buttons)]
    pub fn buttons(this: &JsPayPal, options: &JsValue) -> Result<JsButtons, JsValue>;

    /// `paypal.Googlepay` without calling it; undefined unless the component loaded
    #[wasm_bindgen(method, getter, js_name = Googlepay)]
    pub fn googlepay_component(this: &JsPayPal) -> JsValue;

    /// `paypal.Googlepay()`
    #[wasm_bindgen(method, catch, js_name = Googlepay)]
    pub fn googlepay(this: &JsPayPal) -> Result<JsGooglepay, JsValue>;

    //------------------------------------------------------------------------------
    // Instance Methods
    //------------------------------------------------------------------------------

    /// `googlepay.config()` → JS `Promise` of the wallet configuration
    #[wasm_bindgen(method, catch)]
    pub fn config(this: &JsGooglepay) -> Result<Promise, JsValue>;

    /// `buttons.isEligible()`
    #[wasm_bindgen(method, js_name = isEligible)]
    pub fn is_eligible(this: &JsButtons) -> bool;

    /// `buttons.render(selector)` → JS `Promise`
    #[wasm_bindgen(method, catch)]
    pub fn render(this: &JsButtons, selector: &str) -> Result<Promise, JsValue>;

    /// `buttons.close()` → JS `Promise`
    #[wasm_bindgen(method, catch)]
    pub fn close(this: &JsButtons) -> Result<Promise, JsValue>;

    /// `actions.order.create(descriptor)` → JS `Promise` of the order id
    #[wasm_bindgen(method, catch)]
    pub fn create(this: &JsOrderActions, descriptor: &JsValue) -> Result<Promise, JsValue>;

    /// `actions.order.capture()` → JS `Promise` of the capture details
    #[wasm_bindgen(method, catch)]
    pub fn capture(this: &JsOrderActions) -> Result<Promise, JsValue>;
}

/// `window.paypal`, once the script has loaded
pub fn paypal() -> Option<JsPayPal> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str("paypal")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(value.unchecked_into())
}

/// `actions.order` from the second argument of a button callback
pub fn order_actions(actions: &JsValue) -> Result<JsOrderActions, SdkError> {
    let order = Reflect::get(actions, &JsValue::from_str("order")).map_err(js_error)?;
    if order.is_undefined() {
        return Err(SdkError::new("callback actions carry no order"));
    }
    Ok(order.unchecked_into())
}

/// Await a JS promise, mapping rejection to `SdkError`
pub async fn settle(promise: Promise) -> Result<JsValue, SdkError> {
    JsFuture::from(promise).await.map_err(js_error)
}

/// Convert a thrown JS value into an SDK error
pub fn js_error(value: JsValue) -> SdkError {
    if let Some(err) = value.dyn_ref::<Error>() {
        return SdkError::new(String::from(err.message()));
    }
    value
        .as_string()
        .map_or_else(|| SdkError::new(format!("{value:?}")), SdkError::new)
}

/// Serialize through JSON into a plain JS object
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, SdkError> {
    let json = serde_json::to_string(value).map_err(|e| SdkError::new(e.to_string()))?;
    JSON::parse(&json).map_err(js_error)
}

/// Deserialize a plain JS object through JSON
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, SdkError> {
    let json: String = JSON::stringify(value).map_err(js_error)?.into();
    serde_json::from_str(&json).map_err(|e| SdkError::new(e.to_string()))
}
