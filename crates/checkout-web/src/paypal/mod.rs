//! PayPal JS SDK Integration

mod bindings;
mod client;

pub use client::PayPalSdk;
