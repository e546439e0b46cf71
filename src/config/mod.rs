//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PAYMOB_ACCEPT` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use paymob_accept::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod paymob;
mod server;

pub use error::{ConfigError, ValidationError};
pub use paymob::PaymobConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gateway configuration (credentials, integration, callbacks)
    pub paymob: PaymobConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PAYMOB_ACCEPT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PAYMOB_ACCEPT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAYMOB_ACCEPT__PAYMOB__USERNAME=...` -> `paymob.username = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMOB_ACCEPT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.paymob.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("PAYMOB_ACCEPT__PAYMOB__USERNAME", "merchant");
        env::set_var("PAYMOB_ACCEPT__PAYMOB__PASSWORD", "secret");
        env::set_var("PAYMOB_ACCEPT__PAYMOB__INTEGRATION_ID", "329");
        env::set_var("PAYMOB_ACCEPT__PAYMOB__IFRAME_ID", "3470");
    }

    fn clear_env() {
        env::remove_var("PAYMOB_ACCEPT__PAYMOB__USERNAME");
        env::remove_var("PAYMOB_ACCEPT__PAYMOB__PASSWORD");
        env::remove_var("PAYMOB_ACCEPT__PAYMOB__INTEGRATION_ID");
        env::remove_var("PAYMOB_ACCEPT__PAYMOB__IFRAME_ID");
        env::remove_var("PAYMOB_ACCEPT__PAYMOB__HMAC_SECRET");
        env::remove_var("PAYMOB_ACCEPT__SERVER__PORT");
        env::remove_var("PAYMOB_ACCEPT__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.paymob.username, "merchant");
        assert_eq!(config.paymob.password.expose_secret(), "secret");
        assert_eq!(config.paymob.integration_id, 329);
        assert_eq!(config.paymob.iframe_id, 3470);
        assert!(config.paymob.callback_signature().is_none());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_fail_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("PAYMOB_ACCEPT__PAYMOB__INTEGRATION_ID", "329");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_production_requires_hmac_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAYMOB_ACCEPT__SERVER__ENVIRONMENT", "production");
        let without_secret = AppConfig::load();
        env::set_var("PAYMOB_ACCEPT__PAYMOB__HMAC_SECRET", "hmac-secret");
        let with_secret = AppConfig::load();
        clear_env();

        let without_secret = without_secret.unwrap();
        assert!(without_secret.is_production());
        assert_eq!(
            without_secret.validate(),
            Err(ValidationError::HmacSecretRequired)
        );
        assert!(with_secret.unwrap().validate().is_ok());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAYMOB_ACCEPT__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
