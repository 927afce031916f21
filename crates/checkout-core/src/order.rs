//! Order Model
//!
//! The fixed purchase the page sells, and the wire shapes exchanged with the
//! provider when an order is created and captured.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::funding::FundingSource;

/// Description sent with every purchase unit
pub const ORDER_DESCRIPTION: &str = "Premium Product Purchase";

/// A single row of the order summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// The purchase every button pays for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub items: Vec<LineItem>,
    pub description: String,
    pub currency: String,
}

impl Default for OrderIntent {
    fn default() -> Self {
        Self::demo()
    }
}

impl OrderIntent {
    pub fn new(description: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            description: description.into(),
            currency: currency.into(),
        }
    }

    /// Builder-style line item
    #[must_use]
    pub fn with_item(mut self, label: impl Into<String>, amount: Decimal) -> Self {
        self.items.push(LineItem::new(label, amount));
        self
    }

    /// The demo order: product, shipping and tax
    pub fn demo() -> Self {
        Self::new(ORDER_DESCRIPTION, "USD")
            .with_item("Premium Product", dec!(19.99))
            .with_item("Shipping", dec!(2.99))
            .with_item("Tax", dec!(1.99))
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Total as the provider expects it: plain decimal, two places
    pub fn amount_value(&self) -> String {
        format!("{:.2}", self.total())
    }

    /// Build the order-creation payload for a button activation.
    ///
    /// Independent of the funding source; the amount is passed through as an
    /// opaque decimal string and left for the provider to validate.
    pub fn purchase_request(&self) -> OrderCreationRequest {
        OrderCreationRequest {
            purchase_units: vec![PurchaseUnit {
                amount: UnitAmount {
                    currency_code: Some(self.currency.clone()),
                    value: self.amount_value(),
                },
                description: self.description.clone(),
            }],
        }
    }
}

/// Format an amount for display (`$24.97`)
pub fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Payload for `actions.order.create`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreationRequest {
    pub purchase_units: Vec<PurchaseUnit>,
}

impl OrderCreationRequest {
    /// Amount of the first (only) purchase unit
    pub fn amount_value(&self) -> Option<&str> {
        self.purchase_units.first().map(|u| u.amount.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub amount: UnitAmount,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAmount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    pub value: String,
}

/// Provider-assigned order identifier, passed through unmodified
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data handed to the approve callback
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(rename = "orderID")]
    pub order_id: OrderId,
    #[serde(default, rename = "payerID", skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
}

impl Approval {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            payer_id: None,
        }
    }
}

/// Result of `actions.order.capture`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDetails {
    pub id: OrderId,
    #[serde(default)]
    pub status: Option<String>,
}

/// A completed payment; handed once to the completion callback
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub funding: FundingSource,
    pub order_id: OrderId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_total() {
        let intent = OrderIntent::demo();
        assert_eq!(intent.total(), dec!(24.97));
        assert_eq!(intent.amount_value(), "24.97");
        assert_eq!(format_amount(intent.total()), "$24.97");
        assert_eq!(format_amount(dec!(2.9)), "$2.90");
    }

    #[test]
    fn test_purchase_request_wire_shape() {
        let request = OrderIntent::demo().purchase_request();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "purchase_units": [{
                    "amount": { "currency_code": "USD", "value": "24.97" },
                    "description": "Premium Product Purchase"
                }]
            })
        );
    }

    #[test]
    fn test_capture_details_from_provider_json() {
        let details: CaptureDetails = serde_json::from_str(
            r#"{"id":"5O190127TN364715T","status":"COMPLETED","intent":"CAPTURE"}"#,
        )
        .unwrap();
        assert_eq!(details.id.as_str(), "5O190127TN364715T");
        assert_eq!(details.status.as_deref(), Some("COMPLETED"));

        let approval: Approval =
            serde_json::from_str(r#"{"orderID":"5O190127TN364715T","payerID":"QYR5Z8XDVJNXQ"}"#)
                .unwrap();
        assert_eq!(approval.order_id, details.id);
    }
}
