//! Shopper Notices
//!
//! Blocking notices raised by button callbacks. Computing a notice is kept
//! apart from showing it: the page decides how (`window.alert`), tests record.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::funding::FundingSource;
use crate::order::PaymentOutcome;

/// A blocking notice for the shopper
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Capture succeeded
    PaymentSucceeded(PaymentOutcome),
    /// Order creation, capture or the provider failed
    PaymentFailed {
        funding: FundingSource,
        message: String,
    },
}

impl Notice {
    /// Text shown to the shopper
    pub fn message(&self) -> String {
        match self {
            Self::PaymentSucceeded(outcome) => format!(
                "{} successful! Order ID: {}",
                outcome.funding.success_label(),
                outcome.order_id
            ),
            Self::PaymentFailed { message, .. } => message.clone(),
        }
    }

    pub const fn funding(&self) -> FundingSource {
        match self {
            Self::PaymentSucceeded(outcome) => outcome.funding,
            Self::PaymentFailed { funding, .. } => *funding,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::PaymentSucceeded(_))
    }
}

/// Where notices are delivered
pub trait NoticeSink {
    fn notify(&self, notice: &Notice);
}

/// In-memory sink that keeps every notice
#[derive(Default)]
pub struct MemoryNoticeSink {
    notices: RefCell<Vec<Notice>>,
}

impl MemoryNoticeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl NoticeSink for MemoryNoticeSink {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderId;

    #[test]
    fn test_success_messages() {
        let notice = Notice::PaymentSucceeded(PaymentOutcome {
            funding: FundingSource::Primary,
            order_id: OrderId::new("5O190127TN364715T"),
        });
        assert_eq!(notice.message(), "Payment successful! Order ID: 5O190127TN364715T");
        assert!(notice.is_success());

        let notice = Notice::PaymentSucceeded(PaymentOutcome {
            funding: FundingSource::Wallet,
            order_id: OrderId::new("8GB67279RC051624C"),
        });
        assert_eq!(
            notice.message(),
            "Google Pay payment successful! Order ID: 8GB67279RC051624C"
        );

        let notice = Notice::PaymentSucceeded(PaymentOutcome {
            funding: FundingSource::Alternative,
            order_id: OrderId::new("3C679366HH908993F"),
        });
        assert_eq!(notice.message(), "Payment successful! Order ID: 3C679366HH908993F");
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemoryNoticeSink::new();
        assert!(sink.is_empty());
        sink.notify(&Notice::PaymentFailed {
            funding: FundingSource::Alternative,
            message: "Card payment failed. Please try again.".into(),
        });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.notices()[0].funding(), FundingSource::Alternative);
    }
}
