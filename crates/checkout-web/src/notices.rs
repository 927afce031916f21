//! Browser Notices

use checkout_core::{Notice, NoticeSink};
use wasm_bindgen::JsValue;

/// Shows each notice as a blocking `window.alert`
pub struct AlertNotices;

impl NoticeSink for AlertNotices {
    fn notify(&self, notice: &Notice) {
        let message = notice.message();
        if notice.is_success() {
            web_sys::console::log_1(&JsValue::from_str(&message));
        } else {
            web_sys::console::error_1(&JsValue::from_str(&message));
        }
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&message);
        }
    }
}
