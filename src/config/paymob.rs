//! Paymob gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::paymob::{CallbackSignature, PaymobClientConfig, DEFAULT_API_BASE_URL};
use crate::application::handlers::payment::{
    CheckoutSettings, DEFAULT_CURRENCY, DEFAULT_PAYMENT_KEY_EXPIRATION_SECS,
};
use crate::ports::Credentials;

use super::error::ValidationError;
use super::server::Environment;

/// Paymob Accept configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymobConfig {
    /// Merchant dashboard username
    pub username: String,

    /// Merchant dashboard password
    pub password: SecretString,

    /// Card payment integration id
    pub integration_id: u64,

    /// Hosted card form (iframe) id
    pub iframe_id: u64,

    /// Processed-callback HMAC secret. Verification is off when unset.
    #[serde(default)]
    pub hmac_secret: Option<SecretString>,

    /// Gateway base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Currency accepted by the integration
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Nominal payment key lifetime in seconds
    #[serde(default = "default_payment_key_expiration")]
    pub payment_key_expiration_secs: u64,
}

impl PaymobConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.expose_secret().clone())
    }

    pub fn client_config(&self) -> PaymobClientConfig {
        PaymobClientConfig::new()
            .with_base_url(self.api_base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings::new(self.credentials(), self.integration_id, self.iframe_id)
            .with_iframe_base_url(self.api_base_url.clone())
            .with_currency(self.currency.clone())
            .with_payment_key_expiration(self.payment_key_expiration_secs)
    }

    /// Callback verifier, when a non-empty HMAC secret is configured.
    pub fn callback_signature(&self) -> Option<CallbackSignature> {
        self.hmac_secret
            .as_ref()
            .map(|secret| secret.expose_secret().trim())
            .filter(|secret| !secret.is_empty())
            .map(CallbackSignature::new)
    }

    /// Validate Paymob configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMOB_ACCEPT__PAYMOB__USERNAME"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMOB_ACCEPT__PAYMOB__PASSWORD"));
        }
        if self.integration_id == 0 {
            return Err(ValidationError::InvalidGatewayId("integration_id"));
        }
        if self.iframe_id == 0 {
            return Err(ValidationError::InvalidGatewayId("iframe_id"));
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(ValidationError::InvalidApiBaseUrl);
        }

        if *environment == Environment::Production {
            if !self.api_base_url.starts_with("https://") {
                return Err(ValidationError::ApiBaseUrlMustBeHttps);
            }
            if self.callback_signature().is_none() {
                return Err(ValidationError::HmacSecretRequired);
            }
        }

        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.payment_key_expiration_secs == 0 {
            return Err(ValidationError::InvalidPaymentKeyExpiration);
        }

        Ok(())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_payment_key_expiration() -> u64 {
    DEFAULT_PAYMENT_KEY_EXPIRATION_SECS
}
