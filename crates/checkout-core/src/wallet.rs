//! Wallet Configuration
//!
//! Payload returned by the provider's wallet eligibility probe. It is consumed
//! only by the wallet button and never mutated after the probe produces it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wallet configuration as reported by the provider (camelCase on the wire)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfiguration {
    #[serde(default)]
    pub allowed_payment_methods: Vec<AllowedPaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_info: Option<MerchantInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version_minor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl WalletConfiguration {
    pub fn has_allowed_methods(&self) -> bool {
        !self.allowed_payment_methods.is_empty()
    }

    /// Card networks accepted by any allowed method
    pub fn card_networks(&self) -> Vec<&str> {
        let mut networks: Vec<&str> = self
            .allowed_payment_methods
            .iter()
            .flat_map(|m| m.parameters.allowed_card_networks.iter().map(String::as_str))
            .collect();
        networks.sort_unstable();
        networks.dedup();
        networks
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_origin: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedPaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,
    #[serde(default)]
    pub parameters: CardParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenization_specification: Option<TokenizationSpecification>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardParameters {
    #[serde(default)]
    pub allowed_auth_methods: Vec<String>,
    #[serde(default)]
    pub allowed_card_networks: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenizationSpecification {
    #[serde(rename = "type")]
    pub spec_type: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

/// Outcome of probing the loaded SDK for wallet support
#[derive(Clone, Debug, PartialEq)]
pub enum WalletCapability {
    /// The wallet component is not part of the loaded SDK
    Missing,
    /// The component answered with its configuration
    Configured(WalletConfiguration),
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER_CONFIG: &str = r#"{
        "isEligible": true,
        "apiVersion": 2,
        "apiVersionMinor": 0,
        "countryCode": "US",
        "merchantInfo": { "merchantId": "BCR2DN4T6Z3WWIJJ", "merchantOrigin": "shop.example" },
        "allowedPaymentMethods": [{
            "type": "CARD",
            "parameters": {
                "allowedAuthMethods": ["PAN_ONLY", "CRYPTOGRAM_3DS"],
                "allowedCardNetworks": ["VISA", "MASTERCARD", "AMEX", "VISA"],
                "billingAddressRequired": true
            },
            "tokenizationSpecification": {
                "type": "PAYMENT_GATEWAY",
                "parameters": { "gateway": "paypalppcp", "gatewayMerchantId": "X9Y8" }
            }
        }]
    }"#;

    #[test]
    fn test_parse_provider_config() {
        let config: WalletConfiguration = serde_json::from_str(PROVIDER_CONFIG).unwrap();
        assert!(config.has_allowed_methods());
        assert_eq!(config.api_version, Some(2));
        assert_eq!(config.card_networks(), vec!["AMEX", "MASTERCARD", "VISA"]);

        let method = &config.allowed_payment_methods[0];
        assert_eq!(method.method_type, "CARD");
        let tokenization = method.tokenization_specification.as_ref().unwrap();
        assert_eq!(tokenization.parameters["gateway"], "paypalppcp");
    }

    #[test]
    fn test_empty_config_has_no_methods() {
        let config: WalletConfiguration =
            serde_json::from_str(r#"{"allowedPaymentMethods":[]}"#).unwrap();
        assert!(!config.has_allowed_methods());
        assert!(config.card_networks().is_empty());
    }
}
