//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Paymob API base URL")]
    InvalidApiBaseUrl,

    #[error("Paymob API base URL must use HTTPS in production")]
    ApiBaseUrlMustBeHttps,

    #[error("Invalid {0}: must be a positive gateway id")]
    InvalidGatewayId(&'static str),

    #[error("Invalid currency code: expected three uppercase letters")]
    InvalidCurrency,

    #[error("Payment key expiration must be positive")]
    InvalidPaymentKeyExpiration,

    #[error("HMAC secret is required in production")]
    HmacSecretRequired,
}
