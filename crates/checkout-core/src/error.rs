//! Error Types

use thiserror::Error;

use crate::funding::FundingSource;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Failure reported by the payment provider SDK
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SdkError {
    pub message: String,
}

impl SdkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for SdkError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for SdkError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Checkout error types
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The provider script could not be loaded
    #[error("Payment SDK failed to load: {0}")]
    SdkLoad(#[source] SdkError),

    /// Wallet eligibility probe rejected (treated as "not eligible")
    #[error("Wallet eligibility probe failed: {0}")]
    EligibilityProbe(#[source] SdkError),

    /// `OrderActions::create` failed
    #[error("Order creation failed for {funding}: {source}")]
    OrderCreation {
        funding: FundingSource,
        #[source]
        source: SdkError,
    },

    /// `OrderActions::capture` failed
    #[error("Capture failed for {funding}: {source}")]
    Capture {
        funding: FundingSource,
        #[source]
        source: SdkError,
    },

    /// Button could not be created or rendered
    #[error("Render failed for {funding}: {source}")]
    Render {
        funding: FundingSource,
        #[source]
        source: SdkError,
    },

    /// Render attempted on a button the SDK reported as ineligible
    #[error("Refusing to render ineligible {0} button")]
    IneligibleRender(FundingSource),

    /// Error raised by the SDK through the button's error callback
    #[error("Provider error for {funding}: {source}")]
    Provider {
        funding: FundingSource,
        #[source]
        source: SdkError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// Funding source the error belongs to, if any
    pub fn funding(&self) -> Option<FundingSource> {
        match self {
            Self::OrderCreation { funding, .. }
            | Self::Capture { funding, .. }
            | Self::Render { funding, .. }
            | Self::Provider { funding, .. } => Some(*funding),
            Self::IneligibleRender(funding) => Some(*funding),
            Self::SdkLoad(_) | Self::EligibilityProbe(_) | Self::Config(_) => None,
        }
    }

    /// Convert to a user-facing notice text
    pub fn user_message(&self) -> String {
        match self {
            Self::OrderCreation { funding, .. }
            | Self::Capture { funding, .. }
            | Self::Provider { funding, .. } => {
                format!("{} failed. Please try again.", funding.payment_label())
            }
            Self::Render { funding, .. } => {
                format!("{} could not be loaded.", funding.display_name())
            }
            Self::IneligibleRender(funding) => {
                format!("{} is not available.", funding.display_name())
            }
            Self::SdkLoad(_) => "Payment options could not be loaded.".into(),
            Self::EligibilityProbe(_) => "Google Pay is not available.".into(),
            Self::Config(_) => "Checkout is misconfigured.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funding_specific_messages() {
        let err = CheckoutError::Capture {
            funding: FundingSource::Wallet,
            source: SdkError::new("INSTRUMENT_DECLINED"),
        };
        assert_eq!(err.user_message(), "Google Pay payment failed. Please try again.");

        let err = CheckoutError::Provider {
            funding: FundingSource::Alternative,
            source: "popup closed".into(),
        };
        assert_eq!(err.user_message(), "Card payment failed. Please try again.");

        let err = CheckoutError::OrderCreation {
            funding: FundingSource::Primary,
            source: "bad request".into(),
        };
        assert_eq!(err.user_message(), "Payment failed. Please try again.");
        assert_eq!(err.funding(), Some(FundingSource::Primary));
    }

    #[test]
    fn test_display_keeps_provider_message() {
        let err = CheckoutError::SdkLoad(SdkError::new("script blocked"));
        assert_eq!(err.to_string(), "Payment SDK failed to load: script blocked");
        assert_eq!(err.funding(), None);

        let err = CheckoutError::IneligibleRender(FundingSource::Wallet);
        assert_eq!(err.to_string(), "Refusing to render ineligible wallet button");
        assert_eq!(err.funding(), Some(FundingSource::Wallet));
    }
}
