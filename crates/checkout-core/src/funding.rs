//! Funding Sources and Mount Points

use serde::{Deserialize, Serialize};

/// Payment method category a button is bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingSource {
    /// Provider balance / account button
    Primary,
    /// Digital wallet (Google Pay)
    Wallet,
    /// Cards and other alternative methods
    Alternative,
}

impl FundingSource {
    /// All funding sources, in display order
    pub const ALL: [Self; 3] = [Self::Primary, Self::Wallet, Self::Alternative];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Wallet => "wallet",
            Self::Alternative => "alternative",
        }
    }

    /// Funding identifier understood by the provider SDK
    pub const fn sdk_code(self) -> &'static str {
        match self {
            Self::Primary => "paypal",
            Self::Wallet => "googlepay",
            Self::Alternative => "card",
        }
    }

    /// Heading shown above the button
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Primary => "PayPal",
            Self::Wallet => "Google Pay",
            Self::Alternative => "Other Payment Methods",
        }
    }

    /// Prefix used in failure notices
    pub const fn payment_label(self) -> &'static str {
        match self {
            Self::Primary => "Payment",
            Self::Wallet => "Google Pay payment",
            Self::Alternative => "Card payment",
        }
    }

    /// Prefix used in success notices; only the wallet is named
    pub const fn success_label(self) -> &'static str {
        match self {
            Self::Primary | Self::Alternative => "Payment",
            Self::Wallet => "Google Pay payment",
        }
    }

    /// Whether the button cannot be built without a wallet configuration
    pub const fn requires_wallet_config(self) -> bool {
        matches!(self, Self::Wallet)
    }

    /// Dedicated mount point; no two funding sources share one
    pub fn mount_point(self) -> MountPoint {
        MountPoint::new(format!("{}-button", self.as_str()))
    }
}

impl std::fmt::Display for FundingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element id a button renders into
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountPoint(String);

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Bare element id
    pub fn id(&self) -> &str {
        &self.0
    }

    /// CSS selector for the element
    pub fn selector(&self) -> String {
        format!("#{}", self.0)
    }
}

impl std::fmt::Display for MountPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mount_points_are_distinct() {
        let ids: HashSet<_> = FundingSource::ALL.iter().map(|f| f.mount_point()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(FundingSource::Wallet.mount_point().id(), "wallet-button");
        assert_eq!(FundingSource::Primary.mount_point().selector(), "#primary-button");
        assert_eq!(
            FundingSource::Alternative.mount_point().id(),
            "alternative-button"
        );
    }

    #[test]
    fn test_only_wallet_needs_config() {
        assert!(FundingSource::Wallet.requires_wallet_config());
        assert!(!FundingSource::Primary.requires_wallet_config());
        assert!(!FundingSource::Alternative.requires_wallet_config());
    }
}
