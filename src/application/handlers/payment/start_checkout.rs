//! StartCheckoutHandler - Command handler for opening a hosted checkout.

use std::sync::Arc;

use thiserror::Error;

use crate::adapters::paymob::DEFAULT_API_BASE_URL;
use crate::domain::foundation::{LocalOrderId, RemoteOrderId};
use crate::domain::order::{LocalOrder, OrderError, OrderStatus};
use crate::domain::payment::BillingData;
use crate::ports::{
    CreateOrderRequest, Credentials, GatewayError, OrderRepository, PaymentGateway,
    PaymentKeyRequest, PaymentKeyToken, RepositoryError,
};

/// Nominal payment key lifetime, in seconds.
pub const DEFAULT_PAYMENT_KEY_EXPIRATION_SECS: u64 = 36_000;

/// Currency accepted by the card integration.
pub const DEFAULT_CURRENCY: &str = "EGP";

/// Merchant settings needed to open a checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub credentials: Credentials,
    pub integration_id: u64,
    pub iframe_id: u64,
    pub iframe_base_url: String,
    pub currency: String,
    pub payment_key_expiration_secs: u64,
}

impl CheckoutSettings {
    pub fn new(credentials: Credentials, integration_id: u64, iframe_id: u64) -> Self {
        Self {
            credentials,
            integration_id,
            iframe_id,
            iframe_base_url: DEFAULT_API_BASE_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            payment_key_expiration_secs: DEFAULT_PAYMENT_KEY_EXPIRATION_SECS,
        }
    }

    pub fn with_iframe_base_url(mut self, url: impl Into<String>) -> Self {
        self.iframe_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_payment_key_expiration(mut self, secs: u64) -> Self {
        self.payment_key_expiration_secs = secs;
        self
    }

    /// URL of the hosted card form for `payment_key`.
    pub fn iframe_url(&self, payment_key: &PaymentKeyToken) -> String {
        format!(
            "{}/api/acceptance/iframes/{}?payment_token={}",
            self.iframe_base_url, self.iframe_id, payment_key
        )
    }
}

/// Command to open a checkout for a local order.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub order_id: LocalOrderId,
    pub billing: BillingData,
}

/// Result of a successful checkout start.
#[derive(Debug, Clone)]
pub struct StartCheckoutResult {
    pub order: LocalOrder,
    pub remote_order_id: RemoteOrderId,
    pub payment_key: PaymentKeyToken,
    pub iframe_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Order {0} not found")]
    OrderNotFound(LocalOrderId),

    #[error("Order {order_id} is already {status}")]
    AlreadySettled {
        order_id: LocalOrderId,
        status: OrderStatus,
    },

    #[error("Order {order_id} is priced in {actual}, the integration accepts {expected}")]
    CurrencyMismatch {
        order_id: LocalOrderId,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Handler for opening a hosted checkout.
///
/// Registers the order with the gateway on first use, then issues a payment
/// key for the hosted card form. An order that already carries a gateway
/// order id reuses it, so a retried checkout never trips the gateway's
/// duplicate merchant order id check.
pub struct StartCheckoutHandler {
    repository: Arc<dyn OrderRepository>,
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
}

impl StartCheckoutHandler {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        gateway: Arc<dyn PaymentGateway>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            repository,
            gateway,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartCheckoutCommand,
    ) -> Result<StartCheckoutResult, CheckoutError> {
        // 1. Load the order
        let mut order = self
            .repository
            .find_by_id(cmd.order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(cmd.order_id))?;

        if order.status().is_terminal() {
            return Err(CheckoutError::AlreadySettled {
                order_id: order.id(),
                status: order.status(),
            });
        }

        if order.currency() != self.settings.currency {
            return Err(CheckoutError::CurrencyMismatch {
                order_id: order.id(),
                expected: self.settings.currency.clone(),
                actual: order.currency().to_string(),
            });
        }

        // 2. Authenticate
        let auth = self.gateway.authenticate(&self.settings.credentials).await?;

        // 3. Register the order unless it already has a gateway order
        let remote_order_id = match order.remote_order_id() {
            Some(existing) => {
                tracing::debug!(
                    order_id = %order.id(),
                    remote_order_id = %existing,
                    "Reusing gateway order"
                );
                existing
            }
            None => {
                let remote = self
                    .gateway
                    .create_order(
                        &auth.token,
                        CreateOrderRequest {
                            merchant_id: auth.profile.id,
                            amount_cents: order.amount_cents(),
                            merchant_order_id: order.merchant_order_id(),
                            currency: order.currency().to_string(),
                        },
                    )
                    .await
                    .map_err(|e| {
                        if let GatewayError::DuplicateOrder { .. } = e {
                            tracing::warn!(
                                order_id = %order.id(),
                                "Gateway already holds this merchant order id, order left pending"
                            );
                        }
                        e
                    })?;

                order.attach_remote_order(remote.id)?;
                self.repository.save(&order).await?;
                remote.id
            }
        };

        // 4. Issue the payment key
        let payment_key = self
            .gateway
            .request_payment_key(
                &auth.token,
                PaymentKeyRequest {
                    amount_cents: order.amount_cents(),
                    order_id: remote_order_id,
                    billing: cmd.billing,
                    currency: order.currency().to_string(),
                    integration_id: self.settings.integration_id,
                    expiration_secs: self.settings.payment_key_expiration_secs,
                },
            )
            .await?;

        let iframe_url = self.settings.iframe_url(&payment_key);

        tracing::info!(
            order_id = %order.id(),
            remote_order_id = %remote_order_id,
            "Checkout started"
        );

        Ok(StartCheckoutResult {
            order,
            remote_order_id,
            payment_key,
            iframe_url,
        })
    }
}
